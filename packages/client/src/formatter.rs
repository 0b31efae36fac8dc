//! Message formatting utilities for client display.

use hiroba_shared::time::millis_to_local_clock;

/// Message formatter for client display
pub struct MessageFormatter;

impl MessageFormatter {
    /// Format a relayed text message with the local time it arrived
    pub fn format_received(content: &str, received_at: i64) -> String {
        format!("\n[{}] {}\n", Self::clock(received_at), content)
    }

    /// Format a binary frame notice
    pub fn format_binary_message(len: usize) -> String {
        format!("\n[binary frame, {} bytes]\n", len)
    }

    /// Format the confirmation shown after a line was sent
    pub fn format_sent_confirmation(sent_at: i64) -> String {
        format!("(sent at {})\n", Self::clock(sent_at))
    }

    /// Format the notice shown when the server ends the connection
    pub fn format_server_closed() -> String {
        "\n* Relay closed the connection\n".to_string()
    }

    fn clock(timestamp: i64) -> String {
        millis_to_local_clock(timestamp).unwrap_or_else(|| "--:--:--".to_string())
    }
}
