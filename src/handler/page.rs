//! Upload page rendering

use crate::config::RuntimeIdentity;

/// Render the upload form, the directory listing and the process identity.
///
/// `action` is the path the page was requested on; the form posts back to
/// it so the page keeps working behind an API Gateway stage prefix.
pub fn render_upload_page(action: &str, files: &[String], identity: &RuntimeIdentity) -> String {
    let items: String = files
        .iter()
        .map(|name| format!("  <li>{}</li>\n", escape_html(name)))
        .collect();

    format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <title>Uploads</title>
</head>
<body>

<form id="upload-form" action="{action}" method="post">
  Select file to upload:
  <input type="file" name="file" id="file">
  <input type="submit" value="Upload" name="submit">
</form>
<p id="status"></p>

<h2>Files:</h2>
<ul>
{items}</ul>

<p>Running as user: {user} (UID: {uid}, GID: {gid})</p>

<script>
document.getElementById("upload-form").addEventListener("submit", async (event) => {{
  event.preventDefault();
  const file = document.getElementById("file").files[0];
  if (!file) {{ return; }}
  const target = event.target.action + "?filename=" + encodeURIComponent(file.name);
  const response = await fetch(target, {{ method: "POST", body: file }});
  document.getElementById("status").textContent = await response.text();
  if (response.ok) {{ window.location.reload(); }}
}});
</script>

</body>
</html>
"#,
        action = escape_html(action),
        user = escape_html(&identity.user),
        uid = identity.uid,
        gid = identity.gid,
    )
}

/// Escape text for inclusion in HTML element content or attribute values
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
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
