use std::collections::VecDeque;

use html5ever::tendril::StrTendril;
use html5ever::tokenizer::states::RawKind;
use html5ever::tokenizer::{
    BufferQueue, TagKind, Token, TokenSink, TokenSinkResult, Tokenizer, TokenizerOpts,
};
use sift_core::HtmlEvent;

/// Bytes handed to html5ever per refill of the event queue.
const CHUNK_SIZE: usize = 8 * 1024;

/// HTML tokenizer backed by html5ever.
///
/// Produces start/end/text events only: comments and doctypes are dropped,
/// entities are decoded, and a self-closing tag yields a start event
/// immediately followed by its end event. `script` and `style` contents are
/// read as raw text. Input is fed in chunks as the events are consumed, so
/// one text run may arrive as several adjacent text events.
#[derive(Debug, Clone, Copy, Default)]
pub struct Html5Tokenizer;

impl sift_core::Tokenizer for Html5Tokenizer {
    fn tokenize<'a>(&self, html: &'a str) -> impl Iterator<Item = HtmlEvent> + 'a {
        Events {
            rest: html,
            input: BufferQueue::default(),
            tokenizer: Tokenizer::new(EventSink::default(), TokenizerOpts::default()),
            finished: false,
        }
    }
}

struct Events<'a> {
    rest: &'a str,
    input: BufferQueue,
    tokenizer: Tokenizer<EventSink>,
    finished: bool,
}

impl Iterator for Events<'_> {
    type Item = HtmlEvent;

    fn next(&mut self) -> Option<HtmlEvent> {
        loop {
            if let Some(event) = self.tokenizer.sink.events.pop_front() {
                return Some(event);
            }
            if self.finished {
                return None;
            }
            if self.rest.is_empty() {
                self.tokenizer.end();
                self.finished = true;
                continue;
            }
            let chunk = next_chunk(&mut self.rest);
            self.input.push_back(StrTendril::from_slice(chunk));
            let _ = self.tokenizer.feed(&mut self.input);
        }
    }
}

/// Split off at most `CHUNK_SIZE` bytes, extended to the next char boundary.
fn next_chunk<'a>(rest: &mut &'a str) -> &'a str {
    let mut end = rest.len().min(CHUNK_SIZE);
    while !rest.is_char_boundary(end) {
        end += 1;
    }
    let (chunk, tail) = rest.split_at(end);
    *rest = tail;
    chunk
}

#[derive(Default)]
struct EventSink {
    events: VecDeque<HtmlEvent>,
}

impl EventSink {
    fn push_text(&mut self, text: &str) {
        if let Some(HtmlEvent::Text(last)) = self.events.back_mut() {
            last.push_str(text);
        } else {
            self.events.push_back(HtmlEvent::Text(text.to_string()));
        }
    }
}

impl TokenSink for EventSink {
    type Handle = ();

    fn process_token(&mut self, token: Token, _line_number: u64) -> TokenSinkResult<()> {
        match token {
            Token::TagToken(tag) => {
                let name = tag.name.to_string();
                match tag.kind {
                    TagKind::StartTag => {
                        let attrs = tag
                            .attrs
                            .iter()
                            .map(|attr| (attr.name.local.to_string(), String::from(&*attr.value)))
                            .collect();
                        self.events.push_back(HtmlEvent::StartTag {
                            name: name.clone(),
                            attrs,
                        });
                        if tag.self_closing {
                            self.events.push_back(HtmlEvent::EndTag { name });
                            return TokenSinkResult::Continue;
                        }
                        match name.as_str() {
                            "script" => return TokenSinkResult::RawData(RawKind::ScriptData),
                            "style" => return TokenSinkResult::RawData(RawKind::Rawtext),
                            _ => {}
                        }
                    }
                    TagKind::EndTag => self.events.push_back(HtmlEvent::EndTag { name }),
                }
            }
            Token::CharacterTokens(text) => self.push_text(&text),
            Token::NullCharacterToken => self.push_text("\0"),
            Token::ParseError(err) => tracing::trace!("HTML parse error: {err}"),
            _ => {}
        }
        TokenSinkResult::Continue
    }
}
