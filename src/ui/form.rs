//! The input form page shown in the main window.

use crate::error::Alert;
use crate::models::ChartKind;
use crate::utils::escape_html;

pub const KIND_PLACEHOLDER: &str = "Select Chart Type";

pub fn form_html(title: &str) -> String {
    let options: String = ChartKind::SELECTABLE
        .iter()
        .map(|k| format!("<option>{}</option>", escape_html(k.label())))
        .collect();

    format!(
        r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>{title}</title>
<style>
  body {{ font-family: sans-serif; margin: 16px; }}
  label, input, select, button {{ display: block; width: 100%; margin-bottom: 8px; box-sizing: border-box; }}
</style>
</head>
<body>
<label for="primary">Enter Stock Ticker:</label>
<input id="primary" type="text" autocomplete="off">
<label for="secondary">Enter Second Stock Ticker for Comparison:</label>
<input id="secondary" type="text" autocomplete="off">
<select id="chart_kind">
  <option selected>{placeholder}</option>
  {options}
</select>
<button id="fetch">Fetch and Display Data</button>
<button id="compare">Compare Stocks</button>
<script>
  let busy = false;
  function setBusy(b) {{
    busy = b;
    document.getElementById("fetch").disabled = b;
    document.getElementById("compare").disabled = b;
  }}
  function showAlert(title, message) {{
    window.alert(title + "\n\n" + message);
  }}
  function send(command) {{
    if (busy) return;
    setBusy(true);
    window.ipc.postMessage(JSON.stringify({{
      command: command,
      primary: document.getElementById("primary").value,
      secondary: document.getElementById("secondary").value,
      chart_kind: document.getElementById("chart_kind").value,
    }}));
  }}
  document.getElementById("fetch").onclick = () => send("fetch_single");
  document.getElementById("compare").onclick = () => send("compare");
</script>
</body>
</html>
"#,
        title = escape_html(title),
        placeholder = KIND_PLACEHOLDER,
    )
}

/// Script that re-enables or disables the form buttons.
pub fn set_busy_script(busy: bool) -> String {
    format!("setBusy({});", busy)
}

/// Script that raises a modal alert in the form window.
pub fn alert_script(alert: &Alert) -> String {
    // serde_json gives a valid JS string literal for arbitrary text
    let title = serde_json::Value::String(alert.title.clone());
    let message = serde_json::Value::String(alert.message.clone());
    format!("showAlert({}, {});", title, message)
}
