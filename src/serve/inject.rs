//! Live reload client script injection.
//!
//! HTML responses get a small inline script connecting to the reload
//! WebSocket. `reload` messages refresh the page; `css` messages re-fetch
//! stylesheets in place with a cache-busting query.

/// Client script template; `__WS_PORT__` is substituted at injection time.
const RELOAD_SCRIPT: &str = r#"<script>
(function () {
  var ws = new WebSocket("ws://localhost:__WS_PORT__");
  ws.onmessage = function (event) {
    var msg = JSON.parse(event.data);
    if (msg.type === "reload") {
      location.reload();
    } else if (msg.type === "css") {
      document.querySelectorAll('link[rel="stylesheet"]').forEach(function (link) {
        var href = link.getAttribute("href");
        if (href) link.setAttribute("href", href.split("?")[0] + "?t=" + Date.now());
      });
    }
  };
})();
</script>"#;

/// Maybe inject the reload client if content is HTML and ws_port is set
pub fn maybe_inject_reload(body: Vec<u8>, content_type: &str, ws_port: Option<u16>) -> Vec<u8> {
    match (content_type.starts_with("text/html"), ws_port) {
        (true, Some(port)) => inject_reload_script(&body, port),
        _ => body,
    }
}

/// Inject the reload script before the `</body>` tag
fn inject_reload_script(content: &[u8], ws_port: u16) -> Vec<u8> {
    let script = RELOAD_SCRIPT.replace("__WS_PORT__", &ws_port.to_string());
    let script_bytes = script.as_bytes();

    const PATTERN: &[u8] = b"</body>";

    // Reverse search for </body> using byte windows
    if let Some(pos) = content
        .windows(PATTERN.len())
        .rposition(|w| w.eq_ignore_ascii_case(PATTERN))
    {
        let mut result = Vec::with_capacity(content.len() + script_bytes.len());
        result.extend_from_slice(&content[..pos]);
        result.extend_from_slice(script_bytes);
        result.extend_from_slice(&content[pos..]);
        return result;
    }

    // No </body> found, append to end (browsers handle this gracefully)
    let mut result = Vec::with_capacity(content.len() + script_bytes.len());
    result.extend_from_slice(content);
    result.extend_from_slice(script_bytes);
    result
}
