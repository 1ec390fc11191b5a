//! SSML request bodies.

/// Wrap `text` in a minimal SSML document for `voice`.
///
/// The language tag is taken from the voice name prefix (`en-US-JennyNeural`
/// → `en-US`).
pub fn render_ssml(voice: &str, text: &str) -> String {
    format!(
        "<speak version='1.0' xmlns='http://www.w3.org/2001/10/synthesis' xml:lang='{lang}'>\
         <voice name='{voice}'>{text}</voice></speak>",
        lang = escape(language_of(voice)),
        voice = escape(voice),
        text = escape(text),
    )
}

fn language_of(voice: &str) -> &str {
    let mut parts = voice.splitn(3, '-');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(lang), Some(region), Some(_)) => &voice[..lang.len() + 1 + region.len()],
        _ => "en-US",
    }
}

fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\'' => out.push_str("&apos;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}
