use chrono::{Days, NaiveDate};
use rust_decimal::Decimal;
use tracing::{info, warn};

use crate::core::billing_date;
use crate::core::{money, AppError, Result};
use crate::modules::assets::services::AddonFeeResolver;
use crate::modules::contracts::models::{Contract, ContractResolution};
use crate::modules::contracts::services::ContractResolver;
use crate::modules::invoices::models::{
    ChargeBreakdown, CreateInvoiceRequest, Invoice, InvoiceResponse,
};
use crate::modules::invoices::repositories::InvoiceRepository;
use crate::modules::invoices::services::balance_tracker::BalanceTracker;

/// Days after signing before a freshly created invoice is considered
/// back-dated and picks up the late penalty at creation time
const BACKDATED_PENALTY_AFTER_DAYS: u64 = 30;

/// Builds and persists invoices: the single entry point for invoice amounts.
///
/// A fresh period invoice carries the period charges (rent, metered
/// utilities, room addons) and an optional penalty; a rollover invoice
/// additionally carries the contract's outstanding balance, delegated to the
/// balance tracker.
pub struct InvoiceCalculator {
    contracts: ContractResolver,
    addon_fees: AddonFeeResolver,
    invoice_repo: InvoiceRepository,
    tracker: BalanceTracker,
    due_days: i64,
    timezone_offset_hours: i32,
}

impl InvoiceCalculator {
    pub fn new(
        contracts: ContractResolver,
        addon_fees: AddonFeeResolver,
        invoice_repo: InvoiceRepository,
        tracker: BalanceTracker,
        due_days: i64,
        timezone_offset_hours: i32,
    ) -> Self {
        Self {
            contracts,
            addon_fees,
            invoice_repo,
            tracker,
            due_days,
            timezone_offset_hours,
        }
    }

    /// Create one invoice for a billing period.
    ///
    /// Contract resolution degrades to the best available contract rather
    /// than failing the billing run; degraded resolutions are warning-logged
    /// together with the invoice they produced.
    pub async fn create_invoice(&self, request: CreateInvoiceRequest) -> Result<InvoiceResponse> {
        let resolution = self
            .contracts
            .resolve(
                request.contract_id.as_deref(),
                request.floor,
                request.room.as_deref(),
            )
            .await?;

        let fallback_reason = match &resolution {
            ContractResolution::Fallback { reason, .. } => Some(reason.clone()),
            ContractResolution::Resolved(_) => None,
        };

        let contract = resolution.into_contract();

        let addon_total = self.addon_fees.monthly_total(&contract.room_id).await?;

        let breakdown = ChargeBreakdown::new(
            request.rent_amount,
            request.water_unit,
            request.water_rate,
            request.electricity_unit,
            request.electricity_rate,
            addon_total,
        )?;

        let create_date = request
            .create_date
            .unwrap_or_else(|| billing_date::billing_today(self.timezone_offset_hours));

        let due_date = create_date
            .checked_add_days(Days::new(self.due_days as u64))
            .ok_or_else(|| AppError::validation("Failed to calculate due date"))?;

        let invoice = if request.include_outstanding_balance {
            self.tracker
                .create_invoice_with_outstanding_balance(
                    &contract.id,
                    &breakdown,
                    create_date,
                    due_date,
                )
                .await?
        } else {
            let penalty = self.resolve_penalty(
                &contract,
                breakdown.rent,
                create_date,
                request.penalty_override,
            )?;

            let invoice = Invoice::issue(
                contract.id.clone(),
                &breakdown,
                penalty,
                create_date,
                due_date,
            );

            self.invoice_repo.create(&invoice).await?
        };

        if let Some(reason) = fallback_reason {
            warn!(
                invoice_id = invoice.id.as_deref().unwrap_or_default(),
                contract_id = %contract.id,
                reason = %reason,
                "Invoice billed against a fallback contract"
            );
        }

        info!(
            invoice_id = invoice.id.as_deref().unwrap_or_default(),
            contract_id = %contract.id,
            net_amount = %invoice.net_amount,
            previous_balance = %invoice.previous_balance,
            penalty_total = %invoice.penalty_total,
            "Invoice created"
        );

        Ok(invoice.into())
    }

    /// Get one invoice as its caller projection
    pub async fn get_invoice(&self, id: &str) -> Result<InvoiceResponse> {
        let invoice = self
            .invoice_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Invoice '{}' not found", id)))?;

        Ok(invoice.into())
    }

    /// List a contract's invoices, newest first
    pub async fn list_contract_invoices(
        &self,
        contract_id: &str,
    ) -> Result<Vec<InvoiceResponse>> {
        let invoices = self.invoice_repo.list_by_contract(contract_id).await?;
        Ok(invoices.into_iter().map(Into::into).collect())
    }

    /// Penalty for a fresh invoice: the explicit override wins; otherwise a
    /// creation date more than 30 days past the contract's signing picks up
    /// the standard late penalty at creation time, mirroring the sweep's
    /// rule for back-dated invoices.
    fn resolve_penalty(
        &self,
        contract: &Contract,
        requested_rent: Decimal,
        create_date: NaiveDate,
        penalty_override: Option<Decimal>,
    ) -> Result<Decimal> {
        if let Some(penalty) = penalty_override {
            if penalty < Decimal::ZERO {
                return Err(AppError::validation(format!(
                    "Penalty override must be non-negative, got: {}",
                    penalty
                )));
            }
            return Ok(money::round_amount(penalty));
        }

        let threshold = contract
            .signed_date
            .checked_add_days(Days::new(BACKDATED_PENALTY_AFTER_DAYS))
            .ok_or_else(|| AppError::validation("Failed to calculate penalty threshold"))?;

        if create_date > threshold {
            return Ok(money::late_penalty(requested_rent));
        }

        Ok(Decimal::ZERO)
    }
}
