//! Invoicing service implementation
//!
//! Issues invoices with generated numbers and default due dates, and owns
//! the invoice status rules including the payment timestamp.

use chrono::{Days, NaiveDate, Utc};
use clearhaul_core::{
    models::{Invoice, InvoiceStatus},
    traits::InvoiceRepository,
    AppError, AppResult,
};
use std::sync::Arc;
use tracing::{debug, instrument};
use uuid::Uuid;

use crate::constants::DEFAULT_DUE_DAYS;

/// Invoice lifecycle service
pub struct InvoicingService<R: InvoiceRepository> {
    invoice_repo: Arc<R>,
}

impl<R: InvoiceRepository> InvoicingService<R> {
    /// Create a new invoicing service
    pub fn new(invoice_repo: Arc<R>) -> Self {
        Self { invoice_repo }
    }

    /// Generate an invoice number from the issue date and a random suffix
    fn next_invoice_number(issued: NaiveDate) -> String {
        let suffix = Uuid::new_v4().simple().to_string();
        format!(
            "INV-{}-{}",
            issued.format("%Y%m%d"),
            suffix[..6].to_uppercase()
        )
    }

    /// Issue an invoice, filling in the number and due date when absent
    #[instrument(skip(self, invoice))]
    pub async fn create_invoice(&self, invoice: &Invoice) -> AppResult<Invoice> {
        debug!("Issuing invoice for client {}", invoice.client_id);

        let mut entity = invoice.clone();

        if entity.invoice_number.is_empty() {
            entity.invoice_number = Self::next_invoice_number(entity.issued_date);
        }

        if entity.due_date.is_none() {
            entity.due_date = entity.issued_date.checked_add_days(Days::new(DEFAULT_DUE_DAYS));
        }

        self.invoice_repo.create(&entity).await
    }

    /// Move an invoice to a new status, enforcing the transition rules
    ///
    /// Transitioning to paid stamps the payment time.
    #[instrument(skip(self))]
    pub async fn transition(&self, id: i64, next: InvoiceStatus) -> AppResult<Invoice> {
        debug!("Transitioning invoice {} to {}", id, next);

        let invoice = self
            .invoice_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::InvoiceNotFound(id.to_string()))?;

        if !invoice.status.can_transition_to(next) {
            return Err(AppError::InvalidTransition {
                from: invoice.status.to_string(),
                to: next.to_string(),
            });
        }

        let paid_at = if next == InvoiceStatus::Paid {
            Some(Utc::now())
        } else {
            None
        };

        self.invoice_repo.update_status(id, next, paid_at).await
    }

    /// Record payment of a sent invoice
    #[instrument(skip(self))]
    pub async fn mark_paid(&self, id: i64) -> AppResult<Invoice> {
        self.transition(id, InvoiceStatus::Paid).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::DateTime;
    use clearhaul_core::traits::Repository;
    use rust_decimal::Decimal;

    struct MockInvoiceRepository {
        invoices: Vec<Invoice>,
    }

    #[async_trait]
    impl Repository<Invoice, i64> for MockInvoiceRepository {
        async fn find_by_id(&self, id: i64) -> AppResult<Option<Invoice>> {
            Ok(self.invoices.iter().find(|i| i.id == id).cloned())
        }

        async fn find_all(&self, _limit: i64, _offset: i64) -> AppResult<Vec<Invoice>> {
            Ok(self.invoices.clone())
        }

        async fn count(&self) -> AppResult<i64> {
            Ok(self.invoices.len() as i64)
        }

        async fn create(&self, entity: &Invoice) -> AppResult<Invoice> {
            Ok(entity.clone())
        }

        async fn update(&self, entity: &Invoice) -> AppResult<Invoice> {
            Ok(entity.clone())
        }

        async fn delete(&self, _id: i64) -> AppResult<bool> {
            Ok(true)
        }
    }

    #[async_trait]
    impl InvoiceRepository for MockInvoiceRepository {
        async fn find_by_number(&self, invoice_number: &str) -> AppResult<Option<Invoice>> {
            Ok(self
                .invoices
                .iter()
                .find(|i| i.invoice_number == invoice_number)
                .cloned())
        }

        async fn list_filtered(
            &self,
            _status: Option<InvoiceStatus>,
            _client_id: Option<i32>,
            _limit: i64,
            _offset: i64,
        ) -> AppResult<(Vec<Invoice>, i64)> {
            Ok((self.invoices.clone(), self.invoices.len() as i64))
        }

        async fn update_status(
            &self,
            id: i64,
            status: InvoiceStatus,
            paid_at: Option<DateTime<Utc>>,
        ) -> AppResult<Invoice> {
            let mut invoice = self
                .invoices
                .iter()
                .find(|i| i.id == id)
                .cloned()
                .ok_or_else(|| AppError::InvoiceNotFound(id.to_string()))?;
            invoice.status = status;
            if paid_at.is_some() {
                invoice.paid_at = paid_at;
            }
            Ok(invoice)
        }
    }

    fn invoice(id: i64, status: InvoiceStatus) -> Invoice {
        Invoice {
            id,
            status,
            amount: Decimal::new(35500, 2),
            issued_date: NaiveDate::from_ymd_opt(2025, 6, 14).unwrap(),
            ..Invoice::default()
        }
    }

    fn service(invoices: Vec<Invoice>) -> InvoicingService<MockInvoiceRepository> {
        InvoicingService::new(Arc::new(MockInvoiceRepository { invoices }))
    }

    #[tokio::test]
    async fn test_create_invoice_generates_number() {
        let svc = service(vec![]);

        let mut draft = invoice(0, InvoiceStatus::Draft);
        draft.invoice_number = String::new();

        let issued = svc.create_invoice(&draft).await.unwrap();
        assert!(issued.invoice_number.starts_with("INV-20250614-"));
        assert_eq!(issued.invoice_number.len(), "INV-20250614-".len() + 6);
    }

    #[tokio::test]
    async fn test_create_invoice_keeps_given_number() {
        let svc = service(vec![]);

        let mut draft = invoice(0, InvoiceStatus::Draft);
        draft.invoice_number = "INV-CUSTOM-1".to_string();

        let issued = svc.create_invoice(&draft).await.unwrap();
        assert_eq!(issued.invoice_number, "INV-CUSTOM-1");
    }

    #[tokio::test]
    async fn test_create_invoice_defaults_due_date() {
        let svc = service(vec![]);

        let draft = invoice(0, InvoiceStatus::Draft);
        let issued = svc.create_invoice(&draft).await.unwrap();
        assert_eq!(issued.due_date, NaiveDate::from_ymd_opt(2025, 7, 14));
    }

    #[tokio::test]
    async fn test_create_invoice_keeps_given_due_date() {
        let svc = service(vec![]);

        let mut draft = invoice(0, InvoiceStatus::Draft);
        draft.due_date = NaiveDate::from_ymd_opt(2025, 6, 21);

        let issued = svc.create_invoice(&draft).await.unwrap();
        assert_eq!(issued.due_date, NaiveDate::from_ymd_opt(2025, 6, 21));
    }

    #[tokio::test]
    async fn test_transition_draft_to_sent() {
        let svc = service(vec![invoice(1, InvoiceStatus::Draft)]);

        let updated = svc.transition(1, InvoiceStatus::Sent).await.unwrap();
        assert_eq!(updated.status, InvoiceStatus::Sent);
        assert!(updated.paid_at.is_none());
    }

    #[tokio::test]
    async fn test_mark_paid_stamps_payment_time() {
        let svc = service(vec![invoice(1, InvoiceStatus::Sent)]);

        let updated = svc.mark_paid(1).await.unwrap();
        assert_eq!(updated.status, InvoiceStatus::Paid);
        assert!(updated.paid_at.is_some());
    }

    #[tokio::test]
    async fn test_draft_cannot_be_paid_directly() {
        let svc = service(vec![invoice(1, InvoiceStatus::Draft)]);

        let err = svc.mark_paid(1).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidTransition { .. }));
    }

    #[tokio::test]
    async fn test_paid_is_terminal() {
        let svc = service(vec![invoice(1, InvoiceStatus::Paid)]);

        let err = svc.transition(1, InvoiceStatus::Void).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidTransition { .. }));
    }

    #[tokio::test]
    async fn test_transition_missing_invoice() {
        let svc = service(vec![]);

        let err = svc.mark_paid(42).await.unwrap_err();
        assert!(matches!(err, AppError::InvoiceNotFound(_)));
    }
}
