// ============================================================
// AGREEMENT RECORD
// ============================================================
// Fixed-shape row produced once at the ingestion boundary

use serde::{Deserialize, Serialize};

/// Sentinel for a missing or blank value.
pub const NOT_AVAILABLE: &str = "N/A";

/// True when a value is blank or the `"N/A"` sentinel.
pub fn is_missing(value: &str) -> bool {
    let trimmed = value.trim();
    trimmed.is_empty() || trimmed == NOT_AVAILABLE
}

/// True when a status counts as compliant.
pub fn is_valid_status(status: &str) -> bool {
    status.to_lowercase() == "valid"
}

/// Logical fields of an agreement record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LogicalField {
    EmployeeIdentifier,
    City,
    Team,
    Status,
    IssueBucket,
    SocietyName,
    Product,
    ReferenceId,
    TransactionDate,
    ReceivedAmount,
    ExternalTraceId,
}

impl LogicalField {
    /// Fields every source must provide, in reporting order.
    pub const REQUIRED: [LogicalField; 6] = [
        LogicalField::EmployeeIdentifier,
        LogicalField::City,
        LogicalField::Team,
        LogicalField::Status,
        LogicalField::IssueBucket,
        LogicalField::SocietyName,
    ];

    pub const OPTIONAL: [LogicalField; 5] = [
        LogicalField::Product,
        LogicalField::ReferenceId,
        LogicalField::TransactionDate,
        LogicalField::ReceivedAmount,
        LogicalField::ExternalTraceId,
    ];

    /// Canonical header label as it appears in the source sheet.
    pub fn label(self) -> &'static str {
        match self {
            LogicalField::EmployeeIdentifier => "Name of Employee",
            LogicalField::City => "CITY",
            LogicalField::Team => "TEAM",
            LogicalField::Status => "Agreement Status Final",
            LogicalField::IssueBucket => "Bucket of Issues",
            LogicalField::SocietyName => "Society Name",
            LogicalField::Product => "Product",
            LogicalField::ReferenceId => "Ref Id",
            LogicalField::TransactionDate => "Transaction Date",
            LogicalField::ReceivedAmount => "Received Amount",
            LogicalField::ExternalTraceId => "Kibana Id",
        }
    }

    /// Header spellings accepted for this field, canonical label first.
    pub fn aliases(self) -> &'static [&'static str] {
        match self {
            LogicalField::EmployeeIdentifier => {
                &["Name of Employee", "Employee Name", "Employee", "Email"]
            }
            LogicalField::City => &["CITY"],
            LogicalField::Team => &["TEAM"],
            LogicalField::Status => &["Agreement Status Final", "Agreement Status", "Status"],
            LogicalField::IssueBucket => &["Bucket of Issues", "Issue Bucket", "Remarks Bucket"],
            LogicalField::SocietyName => &["Society Name", "Society"],
            LogicalField::Product => &["Product"],
            LogicalField::ReferenceId => &["Ref Id", "Reference Id"],
            LogicalField::TransactionDate => &["Transaction Date"],
            LogicalField::ReceivedAmount => &["Received Amount"],
            LogicalField::ExternalTraceId => &["Kibana Id", "Trace Id"],
        }
    }
}

/// One normalized agreement/transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    pub employee_identifier: String,
    pub city: String,
    pub team: String,
    pub status: String,
    pub issue_bucket: String,
    pub society_name: String,
    pub product: String,
    pub reference_id: String,
    pub transaction_date: String,
    pub received_amount: String,
    pub external_trace_id: String,
}

impl Default for Record {
    fn default() -> Self {
        let na = || NOT_AVAILABLE.to_string();
        Self {
            employee_identifier: na(),
            city: na(),
            team: na(),
            status: na(),
            issue_bucket: na(),
            society_name: na(),
            product: na(),
            reference_id: na(),
            transaction_date: na(),
            received_amount: na(),
            external_trace_id: na(),
        }
    }
}

impl Record {
    pub fn get(&self, field: LogicalField) -> &str {
        match field {
            LogicalField::EmployeeIdentifier => &self.employee_identifier,
            LogicalField::City => &self.city,
            LogicalField::Team => &self.team,
            LogicalField::Status => &self.status,
            LogicalField::IssueBucket => &self.issue_bucket,
            LogicalField::SocietyName => &self.society_name,
            LogicalField::Product => &self.product,
            LogicalField::ReferenceId => &self.reference_id,
            LogicalField::TransactionDate => &self.transaction_date,
            LogicalField::ReceivedAmount => &self.received_amount,
            LogicalField::ExternalTraceId => &self.external_trace_id,
        }
    }

    pub(crate) fn slot_mut(&mut self, field: LogicalField) -> &mut String {
        match field {
            LogicalField::EmployeeIdentifier => &mut self.employee_identifier,
            LogicalField::City => &mut self.city,
            LogicalField::Team => &mut self.team,
            LogicalField::Status => &mut self.status,
            LogicalField::IssueBucket => &mut self.issue_bucket,
            LogicalField::SocietyName => &mut self.society_name,
            LogicalField::Product => &mut self.product,
            LogicalField::ReferenceId => &mut self.reference_id,
            LogicalField::TransactionDate => &mut self.transaction_date,
            LogicalField::ReceivedAmount => &mut self.received_amount,
            LogicalField::ExternalTraceId => &mut self.external_trace_id,
        }
    }

    /// All eleven values in declaration order.
    pub fn values(&self) -> [&str; 11] {
        [
            &self.employee_identifier,
            &self.city,
            &self.team,
            &self.status,
            &self.issue_bucket,
            &self.society_name,
            &self.product,
            &self.reference_id,
            &self.transaction_date,
            &self.received_amount,
            &self.external_trace_id,
        ]
    }

    pub fn is_valid(&self) -> bool {
        is_valid_status(&self.status)
    }
}
