//! HTML pages.
//!
//! Pages are assembled with `format!` around a shared layout. Every value
//! that originates from a request goes through [`escape`].

use std::fmt::Write;

use churnlens_ai::Prediction;
use churnlens_core::form::{PAYMENT_METHODS, fields};
use churnlens_core::{Contract, CustomerProfile, InternetService};

const TITLE: &str = "ChurnLens";

/// Escape text for use in HTML element content and quoted attributes.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn layout(heading: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>{heading} | {TITLE}</title>
  <link rel="stylesheet" href="/static/style.css">
</head>
<body>
  <nav class="nav">
    <a href="/">Predict</a>
    <a href="/visualizations">Visualizations</a>
    <a href="/about">About</a>
  </nav>
  <main class="container">
    <h1>{heading}</h1>
{body}
  </main>
</body>
</html>
"#,
        heading = escape(heading),
    )
}

// ── Landing page ──

/// Yes/No questions on the form, as (field, label).
const TOGGLES: &[(&str, &str)] = &[
    (fields::SENIOR_CITIZEN, "Senior citizen"),
    (fields::PARTNER, "Partner"),
    (fields::DEPENDENTS, "Dependents"),
    (fields::PAPERLESS_BILLING, "Paperless billing"),
    (fields::ONLINE_SECURITY, "Online security"),
    (fields::ONLINE_BACKUP, "Online backup"),
    (fields::DEVICE_PROTECTION, "Device protection"),
    (fields::TECH_SUPPORT, "Tech support"),
    (fields::STREAMING_TV, "Streaming TV"),
    (fields::STREAMING_MOVIES, "Streaming movies"),
];

fn select(name: &str, label: &str, options: &[&str]) -> String {
    let mut html = format!(
        "      <label for=\"{name}\">{label}</label>\n      <select id=\"{name}\" name=\"{name}\" required>\n"
    );
    for option in options {
        let option = escape(option);
        let _ = writeln!(html, "        <option value=\"{option}\">{option}</option>");
    }
    html.push_str("      </select>\n");
    html
}

fn number(name: &str, label: &str, step: &str) -> String {
    format!(
        "      <label for=\"{name}\">{label}</label>\n      <input type=\"number\" id=\"{name}\" name=\"{name}\" min=\"0\" step=\"{step}\" required>\n"
    )
}

pub fn index() -> String {
    let contracts: Vec<&str> = Contract::ALL.iter().map(|c| c.as_str()).collect();
    let internet: Vec<&str> = InternetService::ALL.iter().map(|s| s.as_str()).collect();

    let mut form = String::from("    <form method=\"post\" action=\"/predict\" class=\"card\">\n");
    form.push_str(&number(fields::MONTHLY_CHARGES, "Monthly charges", "0.01"));
    form.push_str(&number(fields::TOTAL_CHARGES, "Total charges", "0.01"));
    form.push_str(&number(fields::TENURE, "Tenure (months)", "1"));
    form.push_str(&select(fields::CONTRACT_TYPE, "Contract", &contracts));
    form.push_str(&select(fields::PAYMENT_METHOD, "Payment method", PAYMENT_METHODS));
    form.push_str(&select(fields::INTERNET_SERVICE, "Internet service", &internet));
    for (name, label) in TOGGLES {
        form.push_str(&select(name, label, &["No", "Yes"]));
    }
    form.push_str("      <button type=\"submit\">Predict churn</button>\n    </form>");

    layout("Customer Churn Prediction", &form)
}

// ── Result page ──

pub fn result(prediction: &Prediction, profile: &CustomerProfile) -> String {
    let label = prediction.label;
    let body = format!(
        r#"    <section class="card result {card}">
      <h2 class="{text}">{headline}</h2>
      <p>Confidence: <strong>{confidence}</strong></p>
    </section>
    <section class="card">
      <h3>Customer summary</h3>
      <dl>
        <dt>Monthly charges</dt><dd>{monthly}</dd>
        <dt>Total charges</dt><dd>{total}</dd>
        <dt>Tenure (months)</dt><dd>{tenure}</dd>
        <dt>Contract</dt><dd>{contract}</dd>
        <dt>Payment method</dt><dd>{payment}</dd>
      </dl>
    </section>
    <p><a href="/">Score another customer</a></p>"#,
        card = label.css_name(),
        text = label.css_class(),
        headline = label.headline(),
        confidence = prediction.confidence_display(),
        monthly = profile.monthly_charges,
        total = profile.total_charges,
        tenure = profile.tenure,
        contract = profile.contract,
        payment = escape(&profile.payment_method),
    );
    layout("Prediction Result", &body)
}

// ── Visualizations ──

pub fn gallery(images: &[String]) -> String {
    if images.is_empty() {
        return layout(
            "Visualizations",
            "    <p class=\"muted\">No visualizations available.</p>",
        );
    }

    let mut body = String::from("    <div class=\"gallery\">\n");
    for image in images {
        let name = escape(image);
        let _ = writeln!(
            body,
            "      <figure><img src=\"/static/visualizations/{name}\" alt=\"{name}\"><figcaption>{name}</figcaption></figure>"
        );
    }
    body.push_str("    </div>");
    layout("Visualizations", &body)
}

// ── Static pages ──

pub fn about() -> String {
    layout(
        "About",
        r#"    <section class="card">
      <p>ChurnLens estimates whether a telecom customer is likely to cancel
      their subscription. Form answers are encoded into the nineteen features
      the model was trained on, and the model's class probability is reported
      as the confidence of the prediction.</p>
      <p>Total charges are shown for reference only and do not affect the
      prediction.</p>
    </section>"#,
    )
}

pub fn error_page(heading: &str, message: &str) -> String {
    let body = format!(
        "    <section class=\"card error\">\n      <p>{}</p>\n    </section>\n    <p><a href=\"/\">Back to the form</a></p>",
        escape(message)
    );
    layout(heading, &body)
}
