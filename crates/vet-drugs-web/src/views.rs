//! HTML rendering of the drug pages.
//!
//! Each [`View`] maps to one template; the markup here honours the model
//! attribute names of `drugs/createOrUpdateDrugForm` and `drugs/drugList`.
//! All user-supplied text goes through [`escape`].

use std::fmt::Write;

use axum::http::StatusCode;
use rust_decimal::Decimal;
use vet_drugs_core::controller::{DrugFormView, DrugListView};
use vet_drugs_core::models::PRICE_FRACTION_DIGITS;
use vet_drugs_core::{Flash, View};

/// Render a view, showing `flash` when one was carried over.
pub fn render(view: &View, flash: Option<&Flash>) -> String {
    match view {
        View::Form(model) => drug_form(model, flash),
        View::List(model) => drug_list(model, flash),
    }
}

/// Standalone page for an error status.
pub fn error_page(status: StatusCode, message: &str) -> String {
    let title = status.canonical_reason().unwrap_or("Error");
    let body = format!(
        "<h2>Something happened...</h2>\n<p class=\"error\">{}</p>\n<p><a href=\"/drugs\">Back to drugs</a></p>",
        escape(message)
    );
    layout(title, None, &body)
}

fn layout(title: &str, flash: Option<&Flash>, body: &str) -> String {
    let mut html = String::new();
    let _ = write!(
        html,
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{}</title>\n</head>\n<body>\n",
        escape(title)
    );
    if let Some(flash) = flash {
        if let Some(message) = &flash.message {
            let _ = writeln!(html, "<div class=\"alert alert-success\" id=\"message\">{}</div>", escape(message));
        }
        if let Some(error) = &flash.error {
            let _ = writeln!(html, "<div class=\"alert alert-danger\" id=\"error\">{}</div>", escape(error));
        }
    }
    html.push_str(body);
    html.push_str("\n</body>\n</html>\n");
    html
}

fn drug_form(model: &DrugFormView, flash: Option<&Flash>) -> String {
    let (heading, action, button) = match model.drug.id {
        None => ("New Drug".to_string(), "/drugs/new".to_string(), "Add Drug"),
        Some(id) => ("Drug".to_string(), format!("/drugs/{}/edit", id), "Update Drug"),
    };

    // A rejected submission shows its banner even without a carried flash
    let banner = model.error.as_ref().map(|e| Flash::error(e.clone()));
    let flash = banner.as_ref().or(flash);

    let mut body = String::new();
    let _ = writeln!(body, "<h2>{}</h2>", heading);
    let _ = writeln!(body, "<form method=\"post\" action=\"{}\" id=\"add-drug-form\">", escape(&action));
    form_field(&mut body, model, "name", "Name", &model.drug.name);
    form_field(&mut body, model, "price", "Price", &model.price_input);
    let _ = writeln!(body, "<button type=\"submit\">{}</button>", button);
    body.push_str("</form>");

    layout(&heading, flash, &body)
}

fn form_field(body: &mut String, model: &DrugFormView, field: &str, label: &str, value: &str) {
    let has_error = model.errors.has_field(field);
    let _ = writeln!(
        body,
        "<div class=\"form-group{}\">",
        if has_error { " has-error" } else { "" }
    );
    let _ = writeln!(body, "<label for=\"{field}\">{label}</label>");
    let _ = writeln!(
        body,
        "<input type=\"text\" id=\"{field}\" name=\"{field}\" value=\"{}\">",
        escape(value)
    );
    for message in model.errors.messages_for(field) {
        let _ = writeln!(body, "<span class=\"help-inline\">{}</span>", escape(message));
    }
    body.push_str("</div>\n");
}

fn drug_list(model: &DrugListView, flash: Option<&Flash>) -> String {
    let mut body = String::new();
    body.push_str("<h2>Drugs</h2>\n");
    let _ = writeln!(body, "<p>Total: <span id=\"totalItems\">{}</span></p>", model.total_items);
    body.push_str("<table id=\"drugs\">\n<thead><tr><th>Name</th><th>Price</th><th></th></tr></thead>\n<tbody>\n");
    for drug in &model.list_drugs {
        let id = drug.id.unwrap_or_default();
        let _ = writeln!(
            body,
            "<tr><td>{}</td><td>{}</td><td><a href=\"/drugs/{id}/edit\">Edit</a> <a href=\"/drugs/{id}/delete\">Delete</a></td></tr>",
            escape(&drug.name),
            format_price(drug.price),
        );
    }
    body.push_str("</tbody>\n</table>\n");

    if model.total_pages > 1 {
        body.push_str("<div class=\"pagination\">\n");
        let _ = writeln!(body, "<span>Pages: [{}]</span>", model.total_pages);
        for page in 1..=model.total_pages {
            if page == model.current_page {
                let _ = writeln!(body, "<span class=\"current\">{}</span>", page);
            } else {
                let _ = writeln!(body, "<a href=\"{}\">{}</a>", escape(&page_link(page, model.name.as_deref())), page);
            }
        }
        body.push_str("</div>\n");
    }

    body.push_str("<p><a href=\"/drugs/new\">Add Drug</a></p>");
    layout("Drugs", flash, &body)
}

/// Link to a list page, keeping the name filter.
fn page_link(page: u64, name: Option<&str>) -> String {
    match name {
        Some(name) => format!("/drugs?page={}&name={}", page, url_encode(name)),
        None => format!("/drugs?page={}", page),
    }
}

/// Price at the column scale, e.g. `12.50`.
pub fn format_price(price: Option<Decimal>) -> String {
    match price {
        Some(mut price) => {
            price.rescale(PRICE_FRACTION_DIGITS);
            price.to_string()
        }
        None => String::new(),
    }
}

/// Escape text for HTML element content and quoted attributes.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

/// Percent-encode a query parameter value.
fn url_encode(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for byte in value.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(byte as char)
            }
            _ => {
                let _ = write!(out, "%{:02X}", byte);
            }
        }
    }
    out
}
