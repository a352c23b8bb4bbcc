use std::path::{Path, PathBuf};
use std::process::Command;

use super::{DocumentData, ReportData};
use crate::error::{FacturierError, Result};

/// Embedded Typst template for devis/facture/bon de livraison rendering.
/// Uses a placeholder that gets replaced with the actual JSON file path.
const DOCUMENT_TEMPLATE: &str = r##"// Document Template (devis / facture / bon de livraison)
// Data is loaded from JSON file

#let data = json("DATA_JSON_PATH")
#let accent = rgb(data.accent)

#set page(
  paper: "a4",
  margin: (top: 2cm, bottom: 2cm, left: 2cm, right: 2cm),
)

#set text(font: "Helvetica", size: 10pt)

#let fmt-int(digits) = {
  let len = digits.len()
  let out = ""
  for (i, digit) in digits.clusters().enumerate() {
    if i > 0 and calc.rem(len - i, 3) == 0 {
      out += " "
    }
    out += digit
  }
  out
}

#let fmt-currency(amount) = {
  let parts = str(calc.round(amount, digits: 2)).split(".")
  let whole = fmt-int(parts.at(0))
  let frac = if parts.len() > 1 { parts.at(1) } else { "00" }
  let frac2 = if frac.len() == 1 { frac + "0" } else { frac }
  whole + "," + frac2 + " " + data.currency
}

// Header with company info and document details
#grid(
  columns: (1fr, 1fr),
  align: (left, right),
  [
    #text(size: 18pt, weight: "bold", fill: accent)[#data.company.name]
    #v(0.3em)
    #data.company.address \
    #if data.company.postal_code != none [#data.company.postal_code ] #data.company.city \
    #data.company.phone
    #if data.company.phone2 != none [
      \ #data.company.phone2
    ]
    \ #data.company.email
  ],
  [
    #text(size: 24pt, weight: "bold", fill: accent)[#data.kind]
    #v(0.5em)
    #table(
      columns: (auto, auto),
      stroke: none,
      align: (right, left),
      inset: 2pt,
      [*Numéro:*], [#data.number],
      [*Date:*], [#data.date],
      ..if data.secondary_date != "" {
        ([*#data.secondary_label:*], [#data.secondary_date])
      } else {
        ()
      },
    )
  ]
)

#v(1em)
#line(length: 100%, stroke: 0.5pt + accent)
#v(1em)

// Client block
#grid(
  columns: (1fr, 1fr),
  [
    #text(weight: "bold", size: 11pt)[Client:]
    #v(0.3em)
    #text(weight: "bold")[#data.client.company_name]
    \ #data.client.address
    \ #if data.client.postal_code != none [#data.client.postal_code ] #data.client.city
    \ ICE: #data.client.ice
  ],
  [
    #if data.reference != none [
      #text(weight: "bold", size: 11pt)[#data.reference_label:]
      #v(0.3em)
      #data.reference
    ]
  ]
)

#v(1.5em)

// Lines table. Delivery notes hide the price columns.
#if data.show_prices [
  #table(
    columns: (auto, 1fr, auto, auto, auto, auto, auto),
    align: (center, left, right, right, right, right, right),
    stroke: (x, y) => if y == 0 { (bottom: 1pt + black) } else if y > 0 { (bottom: 0.5pt + gray) },
    inset: 8pt,
    fill: (x, y) => if y == 0 { accent.lighten(85%) } else { none },

    // Header
    [*\#*], [*Désignation*], [*Effectif*], [*Jours*], [*PU HT*], [*TVA*], [*Total HT*],

    // Lines
    ..data.lines.enumerate().map(((i, line)) => (
      str(i + 1),
      line.description,
      str(line.staff_count),
      str(line.days),
      [#fmt-currency(line.unit_price)],
      [#str(line.vat_rate)%],
      [#fmt-currency(line.total_ht)],
    )).flatten()
  )
] else [
  #table(
    columns: (auto, 1fr, auto, auto),
    align: (center, left, right, right),
    stroke: (x, y) => if y == 0 { (bottom: 1pt + black) } else if y > 0 { (bottom: 0.5pt + gray) },
    inset: 8pt,
    fill: (x, y) => if y == 0 { accent.lighten(85%) } else { none },

    [*\#*], [*Désignation*], [*Effectif*], [*Jours*],

    ..data.lines.enumerate().map(((i, line)) => (
      str(i + 1),
      line.description,
      str(line.staff_count),
      str(line.days),
    )).flatten()
  )
]

#v(1em)

// Totals
#if data.show_prices [
  #align(right)[
    #table(
      columns: (auto, auto),
      stroke: none,
      align: (right, right),
      inset: 6pt,

      [Sous-total HT:], [#fmt-currency(data.subtotal)],
      [TVA:], [#fmt-currency(data.vat)],

      table.hline(stroke: 1pt),
      [*Total TTC:*], [*#fmt-currency(data.total)*],
    )
  ]

  #v(1em)
  #text(weight: "bold")[Conditions de règlement:] #data.term
  #if data.company.rib != none [
    \ #text(weight: "bold")[RIB:] #data.company.rib
  ]
]

#if data.company.legal_note != none [
  #v(1em)
  #text(size: 8pt, fill: gray)[#data.company.legal_note]
]

#v(1fr)
#line(length: 100%, stroke: 0.5pt + gray)
#text(size: 8pt, fill: gray)[
  ICE: #data.company.ice
  #if data.company.rc != none [— RC: #data.company.rc ]
  #if data.company.tva_number != none [— TVA: #data.company.tva_number ]
  #if data.company.patente != none [— Patente: #data.company.patente ]
  #if data.company.cnss != none [— CNSS: #data.company.cnss ]
]
"##;

/// Embedded Typst template for the client account report.
const REPORT_TEMPLATE: &str = r##"// Client Account Report Template
// Data is loaded from JSON file

#let data = json("DATA_JSON_PATH")
#let accent = rgb(data.accent)

#set page(
  paper: "a4",
  margin: (top: 2cm, bottom: 2cm, left: 2cm, right: 2cm),
)

#set text(font: "Helvetica", size: 10pt)

#let fmt-int(digits) = {
  let len = digits.len()
  let out = ""
  for (i, digit) in digits.clusters().enumerate() {
    if i > 0 and calc.rem(len - i, 3) == 0 {
      out += " "
    }
    out += digit
  }
  out
}

#let fmt-currency(amount) = {
  let parts = str(calc.round(amount, digits: 2)).split(".")
  let whole = fmt-int(parts.at(0))
  let frac = if parts.len() > 1 { parts.at(1) } else { "00" }
  let frac2 = if frac.len() == 1 { frac + "0" } else { frac }
  whole + "," + frac2 + " " + data.currency
}

// Header with company info and report title
#grid(
  columns: (1fr, 1fr),
  align: (left, right),
  [
    #text(size: 18pt, weight: "bold", fill: accent)[#data.company.name]
    #v(0.3em)
    #data.company.address \
    #if data.company.postal_code != none [#data.company.postal_code ] #data.company.city \
    #data.company.email
  ],
  [
    #text(size: 24pt, weight: "bold", fill: accent)[RELEVÉ CLIENT]
    #v(0.5em)
    #text(size: 10pt, fill: gray)[Édité le #data.generated_date]
  ]
)

#v(1em)
#line(length: 100%, stroke: 0.5pt + accent)
#v(1em)

// Client info block
#grid(
  columns: (1fr, 1fr),
  [
    #text(weight: "bold", size: 11pt)[Client:]
    #v(0.3em)
    #text(weight: "bold")[#data.client.company_name]
    \ #data.client.address
    \ #if data.client.postal_code != none [#data.client.postal_code ] #data.client.city
    \ ICE: #data.client.ice
  ],
  [
    // Filter info (right column)
    #if data.filter_from != none or data.filter_to != none or data.filter_status != none [
      #text(weight: "bold", size: 11pt)[Filtres:]
      #v(0.3em)
      #if data.filter_from != none [
        Du: #data.filter_from \
      ]
      #if data.filter_to != none [
        Au: #data.filter_to \
      ]
      #if data.filter_status != none [
        Statut: #data.filter_status
      ]
    ]
  ]
)

#v(1.5em)

// Invoice table
#table(
  columns: (auto, 1fr, auto, auto, auto),
  align: (left, left, left, right, center),
  stroke: (x, y) => if y == 0 { (bottom: 1pt + black) } else if y > 0 { (bottom: 0.5pt + gray) },
  inset: 8pt,
  fill: (x, y) => if y == 0 { accent.lighten(85%) } else { none },

  // Header
  [*Numéro*], [*Date*], [*Échéance*], [*Total TTC*], [*Statut*],

  // Rows
  ..data.rows.map(row => (
    row.number,
    row.date,
    row.due_date,
    [#fmt-currency(row.total)],
    row.status,
  )).flatten()
)

#v(1.5em)

// Financial summary (right-aligned)
#align(right)[
  #table(
    columns: (auto, auto),
    stroke: none,
    align: (right, right),
    inset: 6pt,

    [Total TTC:], [#fmt-currency(data.total)],
    [Payé:], [#fmt-currency(data.paid)],

    table.hline(stroke: 1pt),
    [*Solde:*], [*#fmt-currency(data.outstanding)*],
  )
]

#v(1fr)
#line(length: 100%, stroke: 0.5pt + gray)
#text(size: 8pt, fill: gray)[
  ICE: #data.company.ice
  #if data.company.rc != none [— RC: #data.company.rc ]
  #if data.company.tva_number != none [— TVA: #data.company.tva_number ]
]
"##;

/// Compile a template + JSON data pair through the Typst CLI.
fn compile_typst(template: &str, stem: &str, json_data: &str, output_path: &Path) -> Result<()> {
    // Check if typst is available
    let typst_check = Command::new("typst").arg("--version").output();

    if typst_check.is_err() {
        return Err(FacturierError::TypstNotFound);
    }

    // Create temp directory for template
    let temp_dir = std::env::temp_dir().join("facturier-cli");
    std::fs::create_dir_all(&temp_dir)?;

    // Write JSON to temp file
    let json_name = format!("{stem}.json");
    let json_path = temp_dir.join(&json_name);
    std::fs::write(&json_path, json_data)?;

    // Write template with relative JSON path (data lives in the same directory)
    let template_content = template.replace("DATA_JSON_PATH", &json_name);
    let template_path = temp_dir.join(format!("{stem}.typ"));
    std::fs::write(&template_path, &template_content)?;

    // Run typst compile with root set to temp directory
    let output = Command::new("typst")
        .args([
            "compile",
            "--root",
            temp_dir.to_str().unwrap_or("."),
            template_path.to_str().unwrap_or(""),
            output_path.to_str().unwrap_or(""),
        ])
        .output()?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(FacturierError::PdfGeneration(stderr.to_string()));
    }

    // Clean up temp files
    let _ = std::fs::remove_file(&template_path);
    let _ = std::fs::remove_file(&json_path);

    Ok(())
}

/// Generate a devis/facture/bon de livraison PDF using the Typst CLI.
pub fn generate_document_pdf(document: &DocumentData, output_path: &PathBuf) -> Result<()> {
    let json_data = serde_json::to_string(document)
        .map_err(|e| FacturierError::PdfGeneration(e.to_string()))?;
    compile_typst(DOCUMENT_TEMPLATE, "document", &json_data, output_path)
}

/// Generate a client account report PDF using the Typst CLI.
pub fn generate_report_pdf(report: &ReportData, output_path: &PathBuf) -> Result<()> {
    let json_data =
        serde_json::to_string(report).map_err(|e| FacturierError::PdfGeneration(e.to_string()))?;
    compile_typst(REPORT_TEMPLATE, "report", &json_data, output_path)
}
