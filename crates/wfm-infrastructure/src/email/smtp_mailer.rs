// ============================================================================
// WFM Infrastructure - SMTP Invoice Mailer
// File: crates/wfm-infrastructure/src/email/smtp_mailer.rs
// Description: Sends invoice summaries over SMTP from a handlebars template
// ============================================================================

use anyhow::{Context, Result};
use async_trait::async_trait;
use handlebars::Handlebars;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use serde_json::json;
use tracing::{debug, info};

use wfm_core::domain::{Invoice, InvoiceItem};
use wfm_core::error::DomainError;
use wfm_core::mailer::InvoiceMailer;
use wfm_shared::config::SmtpSettings;

const INVOICE_TEMPLATE: &str = "invoice";

const INVOICE_TEMPLATE_HTML: &str = r#"<html>
<body>
  <h2>{{kind}} #{{invoice_number}} from {{organization_name}}</h2>
  <p>Issued {{invoice_date}}, due {{due_date}}.</p>
  <table border="1" cellpadding="4" cellspacing="0">
    <tr><th>Description</th><th>Qty</th><th>Price</th><th>Amount</th></tr>
    {{#each items}}
    <tr><td>{{description}}</td><td>{{quantity}}</td><td>{{price}}</td><td>{{total}}</td></tr>
    {{/each}}
  </table>
  <p><b>Total: {{currency}} {{total}}</b></p>
  <p>Amount due: {{currency}} {{amount_due}}</p>
  {{#if terms}}<p>{{terms}}</p>{{/if}}
</body>
</html>"#;

fn build_templates() -> Result<Handlebars<'static>> {
    let mut templates = Handlebars::new();
    templates
        .register_template_string(INVOICE_TEMPLATE, INVOICE_TEMPLATE_HTML)
        .context("Failed to register invoice email template")?;
    Ok(templates)
}

fn render_invoice_email(
    templates: &Handlebars<'static>,
    organization_name: &str,
    invoice: &Invoice,
    items: &[InvoiceItem],
) -> Result<String, DomainError> {
    let item_rows: Vec<serde_json::Value> = items
        .iter()
        .map(|item| {
            json!({
                "description": item.description,
                "quantity": item.quantity,
                "price": format!("{:.2}", item.price),
                "total": format!("{:.2}", item.total_value),
            })
        })
        .collect();

    let data = json!({
        "kind": if invoice.is_estimate { "Estimate" } else { "Invoice" },
        "invoice_number": invoice.invoice_number,
        "organization_name": organization_name,
        "invoice_date": invoice.invoice_date.to_string(),
        "due_date": invoice.due_date.to_string(),
        "items": item_rows,
        "currency": invoice.currency,
        "total": format!("{:.2}", invoice.total_value),
        "amount_due": format!("{:.2}", invoice.amount_due),
        "terms": invoice.terms,
    });

    templates
        .render(INVOICE_TEMPLATE, &data)
        .map_err(|e| DomainError::EmailSendError(format!("Template render failed: {}", e)))
}

struct MailerInner {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    templates: Handlebars<'static>,
}

/// SMTP-backed [`InvoiceMailer`]. When mail is disabled in configuration the
/// mailer is constructed without a transport and sends become no-ops.
pub struct SmtpInvoiceMailer {
    inner: Option<MailerInner>,
}

impl SmtpInvoiceMailer {
    pub fn from_settings(settings: &SmtpSettings) -> Result<Self> {
        if !settings.enabled {
            debug!("SMTP disabled; invoice mail will be skipped");
            return Ok(Self { inner: None });
        }

        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(&settings.host)
            .context("Failed to build SMTP transport")?
            .port(settings.port)
            .credentials(Credentials::new(
                settings.username.clone(),
                settings.password.clone(),
            ))
            .build();

        let from: Mailbox = format!("{} <{}>", settings.from_name, settings.from_address)
            .parse()
            .context("Invalid SMTP from address")?;

        info!("SMTP mailer initialized for {}:{}", settings.host, settings.port);

        Ok(Self {
            inner: Some(MailerInner {
                transport,
                from,
                templates: build_templates()?,
            }),
        })
    }
}

#[async_trait]
impl InvoiceMailer for SmtpInvoiceMailer {
    async fn send_invoice(
        &self,
        to: &str,
        organization_name: &str,
        invoice: &Invoice,
        items: &[InvoiceItem],
    ) -> Result<(), DomainError> {
        let Some(inner) = &self.inner else {
            debug!("Skipping invoice mail to {} (SMTP disabled)", to);
            return Ok(());
        };

        let recipient: Mailbox = to
            .parse()
            .map_err(|_| DomainError::EmailSendError(format!("Invalid recipient: {}", to)))?;

        let subject = format!(
            "{} #{} from {}",
            if invoice.is_estimate { "Estimate" } else { "Invoice" },
            invoice.invoice_number,
            organization_name
        );

        let html = render_invoice_email(&inner.templates, organization_name, invoice, items)?;

        let message = Message::builder()
            .from(inner.from.clone())
            .to(recipient)
            .subject(subject)
            .header(ContentType::TEXT_HTML)
            .body(html)
            .map_err(|e| DomainError::EmailSendError(e.to_string()))?;

        inner
            .transport
            .send(message)
            .await
            .map_err(|e| DomainError::EmailSendError(e.to_string()))?;

        info!("Invoice {} mailed to {}", invoice.invoice_number, to);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;
    use wfm_core::domain::InvoiceStatus;

    fn invoice() -> Invoice {
        let now = Utc::now();
        Invoice {
            id: Uuid::new_v4(),
            tenant_id: Uuid::new_v4(),
            organization_id: Uuid::new_v4(),
            invoice_number: 42,
            invoice_date: now.date_naive(),
            due_date: now.date_naive(),
            currency: "USD".to_string(),
            discount_value: 0.0,
            discount_type: None,
            tax: 0.0,
            tax_type: None,
            tax2: 0.0,
            tax2_type: None,
            discount_after_tax: false,
            terms: Some("Net 30".to_string()),
            total_value: 1200.5,
            already_paid: 0.0,
            amount_due: 1200.5,
            status: InvoiceStatus::Draft,
            is_estimate: false,
            token: None,
            sent_to_email: None,
            created_by_id: None,
            is_active: true,
            is_archived: false,
            archived_at: None,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    #[test]
    fn template_renders_invoice_fields() {
        let templates = build_templates().unwrap();
        let item = InvoiceItem::new(
            Uuid::new_v4(),
            Uuid::new_v4(),
            Uuid::new_v4(),
            "Consulting".to_string(),
            8.0,
            150.0,
            true,
            false,
        )
        .unwrap();

        let html = render_invoice_email(&templates, "Acme", &invoice(), &[item]).unwrap();
        assert!(html.contains("Invoice #42 from Acme"));
        assert!(html.contains("Consulting"));
        assert!(html.contains("USD 1200.50"));
        assert!(html.contains("Net 30"));
    }

    #[test]
    fn template_labels_estimates() {
        let templates = build_templates().unwrap();
        let mut inv = invoice();
        inv.is_estimate = true;
        let html = render_invoice_email(&templates, "Acme", &inv, &[]).unwrap();
        assert!(html.contains("Estimate #42"));
    }

    #[tokio::test]
    async fn disabled_mailer_is_a_no_op() {
        let mailer = SmtpInvoiceMailer::from_settings(&SmtpSettings::default()).unwrap();
        let result = mailer.send_invoice("nobody@example.com", "Acme", &invoice(), &[]).await;
        assert!(result.is_ok());
    }
}
