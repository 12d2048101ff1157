//! AppleScript command construction for the Reminders app.
//!
//! One builder produces exactly one command for one of four verbs:
//!
//! ```text
//! create  make new reminder [at list "L"] with properties {name:"x", ...}
//! read    get {name, body, ...} of every reminder [of list "L"] [whose name is "N"]
//! update  set priority of reminder id "ID" to 9
//! delete  delete (first reminder of list "L" whose name is "N")
//! ```
//!
//! Every command is wrapped in `tell application "Reminders" to ...`.
//! A known id always addresses the reminder directly, replacing any verbal
//! index or name predicate. The list clause reads `at list` for create and
//! `of list` for everything else, whatever order the builder calls came in.

use std::fmt;
use std::str::FromStr;

use super::value::{OsaValue, Properties, quote};

/// Scriptable application the commands are addressed to.
pub const APPLICATION: &str = "Reminders";

/// Properties read when the caller names none.
pub const DEFAULT_PROPERTIES: [&str; 7] = [
    "name", "body", "due date", "priority", "completed", "id", "flagged",
];

/// Command verb.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verb {
    Create,
    Read,
    Update,
    Delete,
}

impl Verb {
    /// Whether a successful run must print something.
    ///
    /// Reads and creates return data; updates and deletes may print nothing.
    #[must_use]
    pub const fn expects_output(&self) -> bool {
        matches!(self, Self::Create | Self::Read)
    }

    #[must_use]
    pub const fn as_str(&self) -> &str {
        match self {
            Self::Create => "create",
            Self::Read => "read",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Positional selector for addressing reminders without a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerbalIndex {
    First,
    Last,
    Some,
    Every,
}

impl VerbalIndex {
    #[must_use]
    pub const fn as_str(&self) -> &str {
        match self {
            Self::First => "first",
            Self::Last => "last",
            Self::Some => "some",
            Self::Every => "every",
        }
    }
}

impl FromStr for VerbalIndex {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "first" => Ok(Self::First),
            "last" => Ok(Self::Last),
            "some" => Ok(Self::Some),
            "every" => Ok(Self::Every),
            _ => Err(format!("Unknown verbal index: {s}")),
        }
    }
}

/// A built command, ready to execute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    verb: Verb,
    script: String,
}

impl Command {
    fn tell(verb: Verb, body: &str) -> Self {
        Self {
            verb,
            script: format!("tell application \"{APPLICATION}\" to {body}"),
        }
    }

    /// `get name of lists`
    #[must_use]
    pub fn list_names() -> Self {
        Self::tell(Verb::Read, "get name of lists")
    }

    /// `make new list with properties {name:"..."}`
    #[must_use]
    pub fn create_list(name: &str) -> Self {
        Self::tell(
            Verb::Create,
            &format!("make new list with properties {{name:{}}}", quote(name)),
        )
    }

    #[must_use]
    pub const fn verb(&self) -> Verb {
        self.verb
    }

    /// Full AppleScript source.
    #[must_use]
    pub fn script(&self) -> &str {
        &self.script
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.script)
    }
}

/// Builder for a single reminder command.
#[derive(Debug, Clone, Default)]
pub struct CommandBuilder {
    verb: Option<Verb>,
    read_properties: Vec<String>,
    payload: Properties,
    assignment: Option<(String, OsaValue)>,
    index: Option<VerbalIndex>,
    list: Option<String>,
    name: Option<String>,
    id: Option<String>,
}

impl CommandBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a reminder with these properties.
    #[must_use]
    pub fn create(mut self, properties: Properties) -> Self {
        self.verb = Some(Verb::Create);
        self.payload = properties;
        self
    }

    /// Read these properties; an empty slice reads [`DEFAULT_PROPERTIES`].
    #[must_use]
    pub fn read<S: AsRef<str>>(mut self, properties: &[S]) -> Self {
        self.verb = Some(Verb::Read);
        self.read_properties = if properties.is_empty() {
            DEFAULT_PROPERTIES.iter().map(ToString::to_string).collect()
        } else {
            properties.iter().map(|p| p.as_ref().to_string()).collect()
        };
        self
    }

    /// Set one property to a value.
    #[must_use]
    pub fn update(mut self, property: impl Into<String>, value: impl Into<OsaValue>) -> Self {
        self.verb = Some(Verb::Update);
        self.assignment = Some((property.into(), value.into()));
        self
    }

    #[must_use]
    pub fn delete(mut self) -> Self {
        self.verb = Some(Verb::Delete);
        self
    }

    #[must_use]
    pub fn index(mut self, index: VerbalIndex) -> Self {
        self.index = Some(index);
        self
    }

    /// Scope to a list. Empty names are ignored.
    #[must_use]
    pub fn in_list(mut self, list: Option<&str>) -> Self {
        self.list = list.filter(|l| !l.is_empty()).map(str::to_string);
        self
    }

    /// Filter by exact name.
    #[must_use]
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Address a reminder by id; takes priority over index and name.
    #[must_use]
    pub fn with_id(mut self, id: Option<&str>) -> Self {
        self.id = id.filter(|i| !i.is_empty()).map(str::to_string);
        self
    }

    fn list_clause(&self, preposition: &str) -> String {
        self.list
            .as_deref()
            .map(|l| format!(" {preposition} list {}", quote(l)))
            .unwrap_or_default()
    }

    fn target(&self, default_index: VerbalIndex) -> String {
        let list = self.list_clause("of");
        if let Some(id) = &self.id {
            return format!("reminder id {}{list}", quote(id));
        }
        let index = self.index.unwrap_or(default_index);
        let name = self
            .name
            .as_deref()
            .map(|n| format!(" whose name is {}", quote(n)))
            .unwrap_or_default();
        format!("{} reminder{list}{name}", index.as_str())
    }

    /// Build the command.
    ///
    /// Returns `None` if no verb was chosen, or an update has no assignment.
    #[must_use]
    pub fn build(&self) -> Option<Command> {
        let Some(verb) = self.verb else {
            tracing::warn!("no command verb selected, nothing to build");
            return None;
        };

        let body = match verb {
            Verb::Create => format!(
                "make new reminder{} with properties {{{}}}",
                self.list_clause("at"),
                self.payload.to_script()
            ),
            Verb::Read => format!(
                "get {{{}}} of {}",
                self.read_properties.join(", "),
                self.target(VerbalIndex::Every)
            ),
            Verb::Update => {
                let (property, value) = self.assignment.as_ref()?;
                format!(
                    "set {property} of {} to {}",
                    self.target(VerbalIndex::First),
                    value.to_script()
                )
            }
            Verb::Delete => format!("delete ({})", self.target(VerbalIndex::First)),
        };

        Some(Command::tell(verb, &body))
    }
}
