//! Status page response builder.
//!
//! The whole HTTP response is a single `format!` template, so placeholders
//! are checked at compile time.  The output depends only on its inputs:
//! identical day/status always yields byte-identical responses.

use crate::app::events::StatusSnapshot;

/// Build the complete HTTP/1.1 response (headers + HTML) for `snapshot`.
///
/// `refresh_ms` is the client-side reload delay embedded in the page.
pub fn render_response(snapshot: &StatusSnapshot, refresh_ms: u32) -> String {
    let day = snapshot.day.name();
    let status = snapshot.status.message();
    format!(
        "HTTP/1.1 200 OK\r\n\
         Content-Type: text/html\r\n\
         Connection: close\r\n\
         Cache-Control: no-cache, no-store, must-revalidate\r\n\
         Pragma: no-cache\r\n\
         Expires: 0\r\n\
         \r\n\
         <!DOCTYPE html><html><head><title>Pill Reminder</title></head>\r\n\
         <body><h1>Pill Reminder System</h1>\r\n\
         <p><strong>Day: </strong>{day}</p>\r\n\
         <p><strong>Status: </strong>{status}</p>\r\n\
         </body></html>\r\n\
         <script>setTimeout(function(){{location.reload();}}, {refresh_ms});</script>\r\n"
    )
}
