//! Messages posted by the form page through `window.ipc.postMessage`.

use crate::controller::{Command, FormSnapshot};
use anyhow::{Context, Result};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
enum IpcMessage {
    FetchSingle(FormFields),
    Compare(FormFields),
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FormFields {
    primary: String,
    secondary: String,
    chart_kind: String,
}

impl From<FormFields> for FormSnapshot {
    fn from(f: FormFields) -> Self {
        FormSnapshot {
            primary: f.primary,
            secondary: f.secondary,
            chart_kind: f.chart_kind,
        }
    }
}

pub fn decode(body: &str) -> Result<Command> {
    let msg: IpcMessage =
        serde_json::from_str(body).with_context(|| format!("Bad IPC message: {}", body))?;
    Ok(match msg {
        IpcMessage::FetchSingle(f) => Command::FetchSingle(f.into()),
        IpcMessage::Compare(f) => Command::Compare(f.into()),
    })
}
