//! Segment / field / component accessors.
//!
//! Field numbering follows the HL7 convention: field 0 is the segment id,
//! `PID-3` is `segment.field(3)`. Components are 1-indexed as well.
//! `None` means the position does not exist in the segment; `Some("")`
//! means it exists but was sent empty.
//!
//! MSH is not special-cased: its field separator is not counted as MSH-1,
//! so MSH positions read one lower than the standard numbering. Nothing in
//! this crate reads MSH fields.

pub const FIELD_SEPARATOR: char = '|';
pub const COMPONENT_SEPARATOR: char = '^';
pub const ESCAPE_CHARACTER: char = '\\';

/// Segment roles the ORU extractor cares about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SegmentType {
    /// Message header.
    Msh,
    /// Patient identification.
    Pid,
    /// Observation request (order).
    Obr,
    /// Observation result.
    Obx,
    Other(String),
}

impl SegmentType {
    pub fn from_id(id: &str) -> Self {
        match id {
            "MSH" => Self::Msh,
            "PID" => Self::Pid,
            "OBR" => Self::Obr,
            "OBX" => Self::Obx,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Msh => "MSH",
            Self::Pid => "PID",
            Self::Obr => "OBR",
            Self::Obx => "OBX",
            Self::Other(id) => id,
        }
    }
}

/// One line of the message, split into fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    kind: SegmentType,
    fields: Vec<String>,
}

impl Segment {
    pub fn parse(line: &str) -> Self {
        let fields = split_unescaped(line, FIELD_SEPARATOR);
        let kind = SegmentType::from_id(fields.first().map(String::as_str).unwrap_or(""));
        Self { kind, fields }
    }

    pub fn kind(&self) -> &SegmentType {
        &self.kind
    }

    /// Number of positions including the segment id.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn field(&self, index: usize) -> Option<Field<'_>> {
        self.fields.get(index).map(|raw| Field { raw })
    }

    /// Field text, with a missing field read as empty.
    pub fn field_or_empty(&self, index: usize) -> &str {
        self.fields.get(index).map(String::as_str).unwrap_or("")
    }
}

/// A borrowed field of a segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field<'a> {
    raw: &'a str,
}

impl<'a> Field<'a> {
    pub fn as_str(&self) -> &'a str {
        self.raw
    }

    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    pub fn has_components(&self) -> bool {
        self.raw.contains(COMPONENT_SEPARATOR)
    }

    /// 1-indexed component. Component 1 of any present field exists.
    pub fn component(&self, index: usize) -> Option<&'a str> {
        if index == 0 {
            return None;
        }
        self.raw.split(COMPONENT_SEPARATOR).nth(index - 1)
    }

    /// First component, which is the whole field when it has no carets.
    pub fn first_component(&self) -> &'a str {
        self.component(1).unwrap_or(self.raw)
    }

    /// Field text with the first caret replaced by a space
    /// (`SMITH^JOHN^A` -> `SMITH JOHN^A`).
    pub fn join_first_component_pair(&self) -> String {
        self.raw.replacen(COMPONENT_SEPARATOR, " ", 1)
    }
}

/// A tokenized message: non-blank lines as segments, in order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Message {
    segments: Vec<Segment>,
}

impl Message {
    /// Split on CR, LF or CRLF, trim each line and drop blank ones. A
    /// leading UTF-8 byte-order mark is ignored.
    pub fn parse(text: &str) -> Self {
        let segments = text
            .trim_start_matches('\u{feff}')
            .split(['\r', '\n'])
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(Segment::parse)
            .collect();
        Self { segments }
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn contains(&self, kind: &SegmentType) -> bool {
        self.segments.iter().any(|s| s.kind() == kind)
    }

    pub fn find(&self, kind: &SegmentType) -> Option<&Segment> {
        self.segments.iter().find(|s| s.kind() == kind)
    }
}

/// Split on `separator` except where it directly follows the escape
/// character. Escape sequences are kept verbatim in the output.
fn split_unescaped(line: &str, separator: char) -> Vec<String> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut previous: Option<char> = None;

    for ch in line.chars() {
        if ch == separator && previous != Some(ESCAPE_CHARACTER) {
            parts.push(std::mem::take(&mut current));
        } else {
            current.push(ch);
        }
        previous = Some(ch);
    }
    parts.push(current);
    parts
}
