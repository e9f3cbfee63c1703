use domain_types::errors;
use error_stack::{report, ResultExt};
use quick_xml::{
    events::{BytesStart, Event},
    Reader,
};

use common_utils::CustomResult;

/// An element of a parsed XML document.
///
/// Element names are stored without their namespace prefix; attribute names keep it
/// (`xsi:type`).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct XmlElement {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub text: String,
    pub children: Vec<XmlElement>,
}

impl XmlElement {
    /// Parses a document and returns its root element.
    pub fn parse(xml: &[u8]) -> CustomResult<Self, errors::ConnectorError> {
        let xml = std::str::from_utf8(xml)
            .change_context(errors::ConnectorError::ResponseDeserializationFailed)
            .attach_printable("XML document is not valid UTF-8")?;

        let mut reader = Reader::from_str(xml);
        reader.trim_text(true);

        let mut open_elements: Vec<Self> = Vec::new();
        let mut root = None;

        loop {
            let event = reader
                .read_event()
                .change_context(errors::ConnectorError::ResponseDeserializationFailed)
                .attach_printable_lazy(|| {
                    format!("malformed XML at position {}", reader.buffer_position())
                })?;

            match event {
                Event::Start(start) => open_elements.push(Self::from_start(&start)?),
                Event::Empty(start) => {
                    let element = Self::from_start(&start)?;
                    attach(&mut open_elements, &mut root, element);
                }
                Event::Text(text) => {
                    if let Some(current) = open_elements.last_mut() {
                        let text = text
                            .unescape()
                            .change_context(errors::ConnectorError::ResponseDeserializationFailed)?;
                        current.text.push_str(&text);
                    }
                }
                Event::CData(data) => {
                    if let Some(current) = open_elements.last_mut() {
                        current
                            .text
                            .push_str(&String::from_utf8_lossy(&data.into_inner()));
                    }
                }
                Event::End(_) => {
                    let element = open_elements.pop().ok_or_else(|| {
                        report!(errors::ConnectorError::ResponseDeserializationFailed)
                            .attach_printable("closing tag without an opening tag")
                    })?;
                    attach(&mut open_elements, &mut root, element);
                }
                Event::Eof => break,
                Event::Decl(_) | Event::PI(_) | Event::Comment(_) | Event::DocType(_) => {}
            }
        }

        if !open_elements.is_empty() {
            return Err(report!(errors::ConnectorError::ResponseDeserializationFailed)
                .attach_printable("XML document ended inside an element"));
        }

        root.ok_or_else(|| {
            report!(errors::ConnectorError::ResponseDeserializationFailed)
                .attach_printable("XML document has no root element")
        })
    }

    fn from_start(start: &BytesStart<'_>) -> CustomResult<Self, errors::ConnectorError> {
        let attributes = start
            .attributes()
            .map(|attribute| {
                let attribute = attribute
                    .change_context(errors::ConnectorError::ResponseDeserializationFailed)?;
                let value = attribute
                    .unescape_value()
                    .change_context(errors::ConnectorError::ResponseDeserializationFailed)?;
                Ok((
                    String::from_utf8_lossy(attribute.key.as_ref()).into_owned(),
                    value.into_owned(),
                ))
            })
            .collect::<CustomResult<Vec<_>, errors::ConnectorError>>()?;

        Ok(Self {
            name: String::from_utf8_lossy(start.local_name().as_ref()).into_owned(),
            attributes,
            text: String::new(),
            children: Vec::new(),
        })
    }

    /// First direct child with the given name.
    pub fn child(&self, name: &str) -> Option<&Self> {
        self.children.iter().find(|child| child.name == name)
    }

    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Self> + 'a {
        self.children.iter().filter(move |child| child.name == name)
    }

    /// Depth first search for an element with the given name, starting with `self`.
    pub fn find(&self, name: &str) -> Option<&Self> {
        if self.name == name {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(name))
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Trimmed text of the element, `None` when empty or marked `xsi:nil`.
    pub fn text(&self) -> Option<&str> {
        if self.attribute("xsi:nil") == Some("true") {
            return None;
        }
        let text = self.text.trim();
        (!text.is_empty()).then_some(text)
    }

    pub fn child_text(&self, name: &str) -> Option<&str> {
        self.child(name).and_then(Self::text)
    }

    pub fn child_string(&self, name: &str) -> Option<String> {
        self.child_text(name).map(ToOwned::to_owned)
    }

    pub fn child_bool(&self, name: &str) -> Option<bool> {
        self.child_text(name)
            .and_then(|value| match value.to_ascii_lowercase().as_str() {
                "true" | "1" => Some(true),
                "false" | "0" => Some(false),
                _ => None,
            })
    }

    pub fn child_i64(&self, name: &str) -> Option<i64> {
        self.child_text(name).and_then(|value| value.parse().ok())
    }
}

fn attach(open_elements: &mut [XmlElement], root: &mut Option<XmlElement>, element: XmlElement) {
    match open_elements.last_mut() {
        Some(parent) => parent.children.push(element),
        None => {
            if root.is_none() {
                *root = Some(element);
            }
        }
    }
}
