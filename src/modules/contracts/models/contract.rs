use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Contract status lifecycle. Transitions are driven by the contract
/// management workflow; the billing engine only reads them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "VARCHAR(20)", rename_all = "lowercase")]
pub enum ContractStatus {
    #[serde(rename = "active")]
    Active,

    #[serde(rename = "expired")]
    Expired,

    #[serde(rename = "terminated")]
    Terminated,
}

impl std::fmt::Display for ContractStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ContractStatus::Active => write!(f, "active"),
            ContractStatus::Expired => write!(f, "expired"),
            ContractStatus::Terminated => write!(f, "terminated"),
        }
    }
}

impl std::str::FromStr for ContractStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "active" => Ok(ContractStatus::Active),
            "expired" => Ok(ContractStatus::Expired),
            "terminated" => Ok(ContractStatus::Terminated),
            _ => Err(format!("Invalid contract status: {}", s)),
        }
    }
}

/// A tenancy agreement linking a tenant to a room for a date range.
///
/// `rent_amount` is a snapshot fixed at signing and never changes afterwards;
/// every invoice for this contract bills against it.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Contract {
    pub id: String,

    pub room_id: String,

    pub tenant_id: String,

    /// Floor the rented room is on, kept for floor+room lookups
    pub floor: i32,

    /// Room number within the floor
    pub room_number: String,

    /// Monthly rent fixed at signing
    pub rent_amount: Decimal,

    /// Date the contract was signed; back-dated invoices created more than
    /// 30 days after this date pick up a late penalty at creation time
    pub signed_date: NaiveDate,

    pub start_date: NaiveDate,

    pub end_date: Option<NaiveDate>,

    pub status: ContractStatus,

    pub created_at: Option<DateTime<Utc>>,

    pub updated_at: Option<DateTime<Utc>>,
}

impl Contract {
    pub fn is_active(&self) -> bool {
        self.status == ContractStatus::Active
    }
}

/// Outcome of contract lookup for a billing run.
///
/// Billing never fails just because the caller's contract reference was
/// missing or wrong; it degrades to the best available contract. The tag
/// lets downstream code and logs tell a deliberate lookup from a guess.
#[derive(Debug, Clone)]
pub enum ContractResolution {
    /// The requested contract was found
    Resolved(Contract),

    /// A best-effort substitute; `reason` records why the requested lookup
    /// did not resolve
    Fallback { contract: Contract, reason: String },
}

impl ContractResolution {
    pub fn contract(&self) -> &Contract {
        match self {
            ContractResolution::Resolved(c) => c,
            ContractResolution::Fallback { contract, .. } => contract,
        }
    }

    pub fn into_contract(self) -> Contract {
        match self {
            ContractResolution::Resolved(c) => c,
            ContractResolution::Fallback { contract, .. } => contract,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, ContractResolution::Fallback { .. })
    }
}
