use crate::logging::record::LogRecord;

/// Single-line format used in production.
pub const PROD_LOG_FORMAT: &str = "[%(asctime)s] %(levelname)s in %(module)s: %(message)s";

/// Multi-line block format used in debug mode.
pub const DEBUG_LOG_FORMAT: &str = concat!(
    "--------------------------------------------------------------------------------\n",
    "%(levelname)s in %(module)s [%(pathname)s:%(lineno)d]:\n",
    "%(message)s\n",
    "--------------------------------------------------------------------------------",
);

const ASCTIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S,%3f";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    AscTime,
    LevelName,
    LevelNo,
    Name,
    Module,
    PathName,
    FileName,
    LineNo,
    Message,
    Process,
}

impl Field {
    fn parse(key: &str) -> Option<Self> {
        Some(match key {
            "asctime" => Field::AscTime,
            "levelname" => Field::LevelName,
            "levelno" => Field::LevelNo,
            "name" => Field::Name,
            "module" => Field::Module,
            "pathname" => Field::PathName,
            "filename" => Field::FileName,
            "lineno" => Field::LineNo,
            "message" => Field::Message,
            "process" => Field::Process,
            _ => return None,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Field(Field),
}

/// Renders records through a parsed template.
///
/// Placeholders are `%(field)s` / `%(field)d`. `%%` is a literal percent and
/// unknown placeholders are copied through unchanged.
#[derive(Debug, Clone)]
pub struct Formatter {
    template: String,
    segments: Vec<Segment>,
}

impl Formatter {
    pub fn new(template: &str) -> Self {
        Self {
            template: template.to_string(),
            segments: parse_template(template),
        }
    }

    pub fn production() -> Self {
        Self::new(PROD_LOG_FORMAT)
    }

    pub fn debug() -> Self {
        Self::new(DEBUG_LOG_FORMAT)
    }

    pub fn template(&self) -> &str {
        &self.template
    }

    pub fn format(&self, record: &LogRecord) -> String {
        let mut out = String::with_capacity(self.template.len() + record.message.len());
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Field(field) => push_field(&mut out, *field, record),
            }
        }
        out
    }
}

fn push_field(out: &mut String, field: Field, record: &LogRecord) {
    match field {
        Field::AscTime => out.push_str(&record.created.format(ASCTIME_FORMAT).to_string()),
        Field::LevelName => out.push_str(record.level.as_str()),
        Field::LevelNo => out.push_str(&record.level.as_number().to_string()),
        Field::Name => out.push_str(&record.name),
        Field::Module => out.push_str(&record.module),
        Field::PathName => out.push_str(&record.pathname),
        Field::FileName => out.push_str(record.filename()),
        Field::LineNo => out.push_str(&record.lineno.to_string()),
        Field::Message => out.push_str(&record.message),
        Field::Process => out.push_str(&record.process.to_string()),
    }
}

fn parse_template(template: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut literal = String::new();
    let mut rest = template;

    while let Some(idx) = rest.find('%') {
        literal.push_str(&rest[..idx]);
        let tail = &rest[idx..];

        if let Some(after) = tail.strip_prefix("%%") {
            literal.push('%');
            rest = after;
            continue;
        }

        match parse_placeholder(tail) {
            Some((field, consumed)) => {
                if !literal.is_empty() {
                    segments.push(Segment::Literal(std::mem::take(&mut literal)));
                }
                segments.push(Segment::Field(field));
                rest = &tail[consumed..];
            }
            None => {
                literal.push('%');
                rest = &tail[1..];
            }
        }
    }
    literal.push_str(rest);
    if !literal.is_empty() {
        segments.push(Segment::Literal(literal));
    }
    segments
}

/// Parses `%(key)s` or `%(key)d` at the start of `input`.
fn parse_placeholder(input: &str) -> Option<(Field, usize)> {
    let body = input.strip_prefix("%(")?;
    let close = body.find(')')?;
    let conversion = body[close + 1..].chars().next()?;
    if conversion != 's' && conversion != 'd' {
        return None;
    }
    let field = Field::parse(&body[..close])?;
    // "%(" + key + ")" + conversion
    Some((field, 2 + close + 1 + 1))
}
