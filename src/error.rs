#[derive(Debug)]
pub enum GpxError {
    /// XML syntax error reported by the tokenizer.
    Xml(quick_xml::Error),
    /// The input ended without a root element.
    MissingRoot,
    /// The root element is not a gpx element.
    UnexpectedRoot(String),
    MissingAttribute {
        element: &'static str,
        attribute: &'static str,
    },
    InvalidAttribute {
        element: &'static str,
        attribute: &'static str,
        value: String,
    },
    /// Element text that cannot be parsed as its declared scalar type.
    InvalidElement {
        element: &'static str,
        value: String,
    },
    InvalidTimestamp {
        value: String,
    },
    /// A timestamp that cannot be represented in RFC 3339 on encode.
    TimestampFormat(time::error::Format),
    Io(std::io::Error),
}

impl GpxError {
    /// Whether this error is a schema-level violation of the document,
    /// as opposed to a failure of the underlying stream.
    pub fn is_malformed(&self) -> bool {
        !matches!(self, Self::Io(_) | Self::TimestampFormat(_))
    }
}

impl std::fmt::Display for GpxError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Xml(e) => write!(f, "XML parse error: {e}"),
            Self::MissingRoot => write!(f, "missing gpx root element"),
            Self::UnexpectedRoot(name) => {
                write!(f, "unexpected root element <{name}>, expected <gpx>")
            }
            Self::MissingAttribute { element, attribute } => {
                write!(f, "missing attribute '{attribute}' on <{element}>")
            }
            Self::InvalidAttribute {
                element,
                attribute,
                value,
            } => write!(
                f,
                "invalid value '{value}' for attribute '{attribute}' on <{element}>"
            ),
            Self::InvalidElement { element, value } => {
                write!(f, "invalid value '{value}' in <{element}>")
            }
            Self::InvalidTimestamp { value } => write!(f, "invalid timestamp '{value}'"),
            Self::TimestampFormat(e) => write!(f, "cannot format timestamp: {e}"),
            Self::Io(e) => write!(f, "I/O error: {e}"),
        }
    }
}

impl std::error::Error for GpxError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Xml(e) => Some(e),
            Self::TimestampFormat(e) => Some(e),
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<quick_xml::Error> for GpxError {
    fn from(e: quick_xml::Error) -> Self {
        Self::Xml(e)
    }
}

impl From<std::io::Error> for GpxError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<time::error::Format> for GpxError {
    fn from(e: time::error::Format) -> Self {
        Self::TimestampFormat(e)
    }
}
