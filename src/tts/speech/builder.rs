use std::time::Duration;

use xml::writer::{Error as WriterError, XmlEvent};
use xml::{EmitterConfig, EventWriter};

use super::Speech;

/// Helper type that can construct a [`Speech`] from a sequence of rendering instructions.
///
/// As long as only text is added, the result is plain [`Speech::Text`]. The first instruction
/// switches the builder to XML. The builder performs no validation of the XML structure, and
/// keeps the first error the XML writer reports until [`build`](SpeechBuilder::build).
pub struct SpeechBuilder {
    state: SpeechBuilderState,
    transcript: String,
    error: Option<WriterError>,
}

enum SpeechBuilderState {
    Text(String),
    Xml(EventWriter<Vec<u8>>),
}

impl SpeechBuilder {
    /// Constructs a new, empty instance.
    pub fn new() -> Self {
        Self {
            state: SpeechBuilderState::Text(String::new()),
            transcript: String::new(),
            error: None,
        }
    }

    /// Emphasizes all subsequent speech until the corresponding
    /// [`end_emphasis`](SpeechBuilder::end_emphasis) call.
    pub fn start_emphasis(&mut self) -> &mut Self {
        self.append_xml(XmlEvent::start_element("emph").into())
    }

    /// Appends text to pronounce.
    pub fn say<S: AsRef<str>>(&mut self, text: S) -> &mut Self {
        self.transcript.push_str(text.as_ref());
        match &mut self.state {
            SpeechBuilderState::Text(contents) => {
                contents.push_str(text.as_ref());
            }
            SpeechBuilderState::Xml(writer) => {
                let result = writer.write(text.as_ref());
                self.keep_error(result);
            }
        };
        self
    }

    /// Appends a silence with a specified duration. Does not support sub-millisecond precision.
    pub fn silence(&mut self, duration: Duration) -> &mut Self {
        let millis = duration.as_millis();
        if millis == 0 {
            return self;
        }

        self.append_xml(XmlEvent::start_element("silence").attr("msec", &millis.to_string()).into())
            .end_element("silence")
    }

    /// Ends the effect of the corresponding [`start_emphasis`](SpeechBuilder::start_emphasis) call.
    pub fn end_emphasis(&mut self) -> &mut Self {
        self.end_element("emph")
    }

    /// Builds the [`Speech`] from instructions received so far. Clears the contents of the builder.
    pub fn build<'s>(&mut self) -> Result<Speech<'s>, WriterError> {
        let state = std::mem::replace(&mut self.state, SpeechBuilderState::Text(String::new()));
        let transcript = std::mem::take(&mut self.transcript);
        if let Some(err) = self.error.take() {
            return Err(err);
        }
        Ok(match state {
            SpeechBuilderState::Text(contents) => Speech::Text(contents.into()),
            SpeechBuilderState::Xml(writer) => Speech::Xml {
                markup: String::from_utf8_lossy(&writer.into_inner()).into_owned().into(),
                transcript: transcript.into(),
            },
        })
    }

    fn end_element(&mut self, name: &str) -> &mut Self {
        self.append_xml(XmlEvent::end_element().name(name).into())
    }

    fn append_xml(&mut self, event: XmlEvent) -> &mut Self {
        let result = match &mut self.state {
            SpeechBuilderState::Text(contents) => {
                let mut writer = EventWriter::new_with_config(
                    Vec::new(),
                    EmitterConfig::new()
                        .keep_element_names_stack(false)
                        .write_document_declaration(false),
                );
                let result = if contents.is_empty() {
                    writer.write(event)
                } else {
                    writer.write(contents.as_ref()).and_then(|_| writer.write(event))
                };
                self.state = SpeechBuilderState::Xml(writer);
                result
            }
            SpeechBuilderState::Xml(writer) => writer.write(event),
        };
        self.keep_error(result);
        self
    }

    fn keep_error(&mut self, result: Result<(), WriterError>) {
        if let Err(err) = result {
            self.error.get_or_insert(err);
        }
    }
}

impl Default for SpeechBuilder {
    fn default() -> Self {
        Self::new()
    }
}
