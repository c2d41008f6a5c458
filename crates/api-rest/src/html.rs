//! Server-rendered pages for the registration form and the read-only summary.
//!
//! Every interpolated value goes through [`escape`].

use emis_core::{BloodType, Genotype, Patient, ValidationError};
use serde::Deserialize;
use std::fmt::Write;

/// Registration form fields as posted by the browser.
///
/// `consent` is a checkbox and is absent from the body when unticked.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FormFields {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub age: String,
    #[serde(default)]
    pub nin: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub emergency_contact: String,
    #[serde(default)]
    pub genotype: String,
    #[serde(default)]
    pub blood_type: String,
    #[serde(default)]
    pub allergies: String,
    #[serde(default)]
    pub medical_history: String,
    pub consent: Option<String>,
}

pub fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
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

fn page(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head><meta charset=\"utf-8\">\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\
         <title>{}</title></head>\n<body>\n{}\n</body>\n</html>\n",
        escape(title),
        body
    )
}

fn text_input(out: &mut String, name: &str, label: &str, value: &str) {
    let _ = write!(
        out,
        "<p><label>{} <input type=\"text\" name=\"{}\" value=\"{}\" required></label></p>\n",
        label,
        name,
        escape(value)
    );
}

fn select(out: &mut String, name: &str, label: &str, options: &[&str], selected: &str) {
    let _ = write!(out, "<p><label>{} <select name=\"{}\">", label, name);
    for option in options {
        let mark = if option.eq_ignore_ascii_case(selected) {
            " selected"
        } else {
            ""
        };
        let _ = write!(
            out,
            "<option value=\"{0}\"{1}>{0}</option>",
            escape(option),
            mark
        );
    }
    out.push_str("</select></label></p>\n");
}

fn bullet_list<'a>(out: &mut String, title: &str, entries: impl Iterator<Item = &'a str>) {
    let _ = write!(out, "<h2>{}</h2>\n", title);
    let items: Vec<_> = entries.collect();
    if items.is_empty() {
        out.push_str("<p>None recorded</p>\n");
        return;
    }
    out.push_str("<ul>\n");
    for item in items {
        let _ = writeln!(out, "<li>{}</li>", escape(item));
    }
    out.push_str("</ul>\n");
}

/// The registration form, optionally refilled after a rejected submission.
pub fn registration_form(error: Option<&ValidationError>, fields: &FormFields) -> String {
    let mut body = String::from("<h1>Patient registration</h1>\n");
    if let Some(error) = error {
        let _ = writeln!(
            body,
            "<p class=\"error\" data-field=\"{}\">{}</p>",
            error.field(),
            escape(&error.to_string())
        );
    }

    body.push_str("<form method=\"post\" action=\"/\">\n");
    text_input(&mut body, "name", "Name", &fields.name);
    text_input(&mut body, "age", "Age", &fields.age);
    text_input(&mut body, "nin", "National ID (NIN)", &fields.nin);
    text_input(&mut body, "phone", "Phone", &fields.phone);
    text_input(
        &mut body,
        "emergency_contact",
        "Emergency contact",
        &fields.emergency_contact,
    );

    let genotypes: Vec<&str> = Genotype::ALL.iter().map(|g| g.as_str()).collect();
    select(&mut body, "genotype", "Genotype", &genotypes, &fields.genotype);
    let blood_types: Vec<&str> = BloodType::ALL.iter().map(|b| b.as_str()).collect();
    select(&mut body, "blood_type", "Blood type", &blood_types, &fields.blood_type);

    let _ = write!(
        body,
        "<p><label>Allergies (comma separated) <textarea name=\"allergies\">{}</textarea></label></p>\n\
         <p><label>Medical history (comma separated) <textarea name=\"medical_history\">{}</textarea></label></p>\n\
         <p><label><input type=\"checkbox\" name=\"consent\"{}> I consent to this information being stored and shown to anyone who scans my code</label></p>\n\
         <p><button type=\"submit\">Save</button></p>\n</form>",
        escape(&fields.allergies),
        escape(&fields.medical_history),
        if fields.consent.is_some() { " checked" } else { "" },
    );

    page("EMIS registration", &body)
}

/// Shown after a successful submission.
pub fn registered_page(
    patient: &Patient,
    created: bool,
    png_base64: &str,
    mirror_warning: Option<&str>,
) -> String {
    let mut body = String::new();
    let _ = writeln!(
        body,
        "<h1>{}</h1>",
        if created {
            "Patient registered"
        } else {
            "Patient record updated"
        }
    );
    let _ = writeln!(
        body,
        "<p>Public identifier: <strong>{}</strong></p>\n<p>Link: <a href=\"{1}\">{1}</a></p>",
        escape(patient.public_id.as_str()),
        escape(&patient.link)
    );
    let _ = writeln!(
        body,
        "<p><img alt=\"QR code for {}\" src=\"data:image/png;base64,{}\"></p>",
        escape(patient.public_id.as_str()),
        png_base64
    );
    if let Some(warning) = mirror_warning {
        let _ = writeln!(body, "<p class=\"warning\">{}</p>", escape(warning));
    }
    body.push_str("<p><a href=\"/\">Register another patient</a></p>");
    page("EMIS registration", &body)
}

/// Read-only medical summary shown to whoever scans the code.
pub fn summary_page(patient: &Patient) -> String {
    let mut body = String::from("<h1>Emergency medical summary</h1>\n<dl>\n");
    let facts = [
        ("Name", patient.name.to_string()),
        ("Age", patient.age.to_string()),
        ("Phone", patient.phone.to_string()),
        ("Emergency contact", patient.emergency_contact.to_string()),
        ("Genotype", patient.genotype.to_string()),
        ("Blood type", patient.blood_type.to_string()),
    ];
    for (label, value) in facts {
        let _ = writeln!(body, "<dt>{}</dt><dd>{}</dd>", label, escape(&value));
    }
    body.push_str("</dl>\n");

    bullet_list(&mut body, "Allergies", patient.allergies.entries());
    bullet_list(&mut body, "Medical history", patient.medical_history.entries());

    page("EMIS summary", &body)
}

pub fn not_found_page(public_id: &str) -> String {
    page(
        "EMIS summary",
        &format!(
            "<h1>No record</h1>\n<p>No patient record found for {}.</p>",
            escape(public_id)
        ),
    )
}

pub fn error_page(message: &str) -> String {
    page(
        "EMIS error",
        &format!("<h1>Something went wrong</h1>\n<p>{}</p>", escape(message)),
    )
}
