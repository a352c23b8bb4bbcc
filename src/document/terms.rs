use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::FacturierError;

/// Payment term of a document. Serialized with its French display string
/// (e.g. "30 jours fin de mois"), which is also the CLI input format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum PaymentTerm {
    OnReceipt,
    Net15,
    #[default]
    Net30,
    EndOfNextMonth,
    Net60,
}

impl PaymentTerm {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentTerm::OnReceipt => "À réception",
            PaymentTerm::Net15 => "15 jours",
            PaymentTerm::Net30 => "30 jours",
            PaymentTerm::EndOfNextMonth => "30 jours fin de mois",
            PaymentTerm::Net60 => "60 jours",
        }
    }

    /// Due date for an invoice issued on `issue`.
    pub fn due_date(&self, issue: NaiveDate) -> NaiveDate {
        match self {
            PaymentTerm::OnReceipt => issue,
            PaymentTerm::Net15 => issue.checked_add_signed(Duration::days(15)).unwrap_or(issue),
            PaymentTerm::Net30 => issue.checked_add_signed(Duration::days(30)).unwrap_or(issue),
            PaymentTerm::Net60 => issue.checked_add_signed(Duration::days(60)).unwrap_or(issue),
            PaymentTerm::EndOfNextMonth => {
                let (year, month) = if issue.month() == 12 {
                    (issue.year() + 1, 1)
                } else {
                    (issue.year(), issue.month() + 1)
                };
                last_day_of_month(year, month).unwrap_or(issue)
            }
        }
    }
}

/// Last calendar day of the given month: first day of the next month,
/// stepped back one day.
fn last_day_of_month(year: i32, month: u32) -> Option<NaiveDate> {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1).and_then(|d| d.pred_opt())
}

impl fmt::Display for PaymentTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentTerm {
    type Err = FacturierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "À réception" => Ok(PaymentTerm::OnReceipt),
            "15 jours" => Ok(PaymentTerm::Net15),
            "30 jours" => Ok(PaymentTerm::Net30),
            "30 jours fin de mois" => Ok(PaymentTerm::EndOfNextMonth),
            "60 jours" => Ok(PaymentTerm::Net60),
            other => Err(FacturierError::InvalidPaymentTerm(other.to_string())),
        }
    }
}

impl TryFrom<String> for PaymentTerm {
    type Error = FacturierError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<PaymentTerm> for String {
    fn from(term: PaymentTerm) -> Self {
        term.as_str().to_string()
    }
}
