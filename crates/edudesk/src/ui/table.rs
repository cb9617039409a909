use std::time::Duration;

use edudesk_session::UploadSession;
use indicatif::{HumanBytes, HumanDuration};
use tabled::settings::{Panel, Style};
use tabled::{Table, Tabled};

#[derive(Debug, Clone, Default)]
pub struct FormatConfig {
    pub footer: Option<String>,
}

pub fn render(data: impl IntoIterator<Item = impl Tabled>, config: FormatConfig) -> Table {
    let mut table = Table::new(data);
    if let Some(footer) = config.footer {
        table.with(Panel::footer(footer));
    }
    table.with(Style::blank());
    table
}

#[derive(Debug, Tabled)]
pub struct SessionRow {
    #[tabled(rename = "TARGET")]
    pub target: String,
    #[tabled(rename = "FILE")]
    pub file: String,
    #[tabled(rename = "SIZE")]
    pub size: String,
    #[tabled(rename = "AGE")]
    pub age: String,
    #[tabled(rename = "STATE")]
    pub state: &'static str,
}

impl From<&UploadSession> for SessionRow {
    fn from(session: &UploadSession) -> Self {
        // Minute precision is plenty here.
        let age = Duration::from_secs(session.age().as_secs() / 60 * 60);
        Self {
            target: session.target_id.clone(),
            file: session.file_name.clone(),
            size: HumanBytes(session.file_size).to_string(),
            age: HumanDuration(age).to_string(),
            state: if session.transfer_complete {
                "awaiting finalize"
            } else {
                "transferring"
            },
        }
    }
}
