/// One row of the source table, reduced to the four tracked fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacementRecord {
    pub contractor: String,
    pub placement_id: String,
    pub month: String,
    pub date: String,
}

/// The two dimensions of service provision the report tracks, one
/// worksheet each.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackedDimension {
    AccountingMonth,
    AccountingDate,
}

impl TrackedDimension {
    pub fn value_of<'r>(&self, record: &'r PlacementRecord) -> &'r str {
        match self {
            TrackedDimension::AccountingMonth => record.month.as_str(),
            TrackedDimension::AccountingDate => record.date.as_str(),
        }
    }
}
