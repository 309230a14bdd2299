/// Header names of the four tracked columns in the source table, matched
/// exactly. Defaults are the producer's labels.
#[derive(serde::Deserialize, Debug, Clone)]
pub struct SourceColumnsConfig {
    #[serde(default = "default_contractor")]
    pub contractor: String,
    #[serde(default = "default_placement_id")]
    pub placement_id: String,
    #[serde(default = "default_accounting_month")]
    pub accounting_month: String,
    #[serde(default = "default_accounting_date")]
    pub accounting_date: String,
}

impl Default for SourceColumnsConfig {
    fn default() -> Self {
        SourceColumnsConfig {
            contractor: default_contractor(),
            placement_id: default_placement_id(),
            accounting_month: default_accounting_month(),
            accounting_date: default_accounting_date(),
        }
    }
}

fn default_contractor() -> String {
    "ФИО/Название\nподрядчика".to_string()
}

fn default_placement_id() -> String {
    "Уникальный номер размещения".to_string()
}

fn default_accounting_month() -> String {
    "Месяц учета оказания услуг".to_string()
}

fn default_accounting_date() -> String {
    "Дата учета оказания услуг".to_string()
}
