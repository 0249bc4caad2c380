//! HTML フラグメントレンダラ
//!
//! ルームの現在のメッセージ一覧を、htmx クライアントがそのままスワップ
//! できる `<div id="messages">` フラグメントとして出力します。投稿者名と
//! 本文は HTML エスケープします。
//!
//! Hub / Dispatcher にとって出力は不透明なペイロードであり、この形式を
//! 知っているのはレンダラとクライアントだけです。

use std::fmt::Write;

use crate::domain::{MessageRenderer, RenderError, StoredMessage};

/// htmx 向け HTML フラグメントレンダラ
#[derive(Debug, Default)]
pub struct HtmlMessageListRenderer;

impl HtmlMessageListRenderer {
    /// 新しい HtmlMessageListRenderer を作成
    pub fn new() -> Self {
        Self
    }
}

impl MessageRenderer for HtmlMessageListRenderer {
    fn render(&self, messages: &[StoredMessage]) -> Result<String, RenderError> {
        let mut html = String::from("<div id=\"messages\" hx-swap-oob=\"innerHTML\">\n");
        for message in messages {
            writeln!(
                html,
                "  <p class=\"message\"><strong>{}</strong>: {}</p>",
                html_escape::encode_text(message.author.as_str()),
                html_escape::encode_text(message.body.as_str()),
            )?;
        }
        html.push_str("</div>");
        Ok(html)
    }
}
