//! Reminders store operations.

use tracing::{debug, info, warn};

use super::command::{Command, CommandBuilder, DEFAULT_PROPERTIES, VerbalIndex};
use super::executor::{ScriptExecutor, ScriptOutput, ScriptRunner};
use super::parse::{parse_list_names, parse_records, parse_reminder_id, parse_structured};
use super::record::ReminderRecord;
use super::value::Properties;

/// The external reminder store consumed by the sync engine.
///
/// Every method reports failure through an empty, `false` or `None` result;
/// the cause has already been logged.
pub trait ReminderStore {
    /// Names of every list.
    fn list_containers(&self) -> Vec<String>;

    /// Create a list.
    fn create_container(&self, name: &str) -> bool;

    /// Every reminder, optionally scoped to one list.
    fn get_records(&self, container: Option<&str>) -> Vec<ReminderRecord>;

    /// Create a reminder and return its new id.
    fn create_record(&self, container: Option<&str>, properties: &Properties) -> Option<String>;

    /// Push a record's properties onto the reminder with its id.
    fn update_record(&self, record: &ReminderRecord) -> bool;

    /// Create the list unless it already exists.
    fn ensure_container(&self, name: &str) -> bool {
        if self.list_containers().iter().any(|c| c == name) {
            return true;
        }
        info!(list = name, "creating reminders list");
        self.create_container(name)
    }
}

/// [`ReminderStore`] backed by AppleScript commands.
#[derive(Debug, Clone, Default)]
pub struct RemindersClient<R> {
    executor: ScriptExecutor<R>,
}

impl<R: ScriptRunner> RemindersClient<R> {
    pub const fn new(runner: R) -> Self {
        Self {
            executor: ScriptExecutor::new(runner),
        }
    }

    pub const fn executor(&self) -> &ScriptExecutor<R> {
        &self.executor
    }

    fn run(&self, builder: &CommandBuilder) -> ScriptOutput {
        builder
            .build()
            .map_or(ScriptOutput::Failed, |command| self.executor.execute(&command))
    }

    /// Delete the reminder with this id.
    pub fn delete_record(&self, id: &str) -> bool {
        let output = self.run(&CommandBuilder::new().delete().with_id(Some(id)));
        if !output.is_success() {
            warn!(external_id = id, "could not delete reminder");
        }
        output.is_success()
    }
}

impl<R: ScriptRunner> ReminderStore for RemindersClient<R> {
    fn list_containers(&self) -> Vec<String> {
        match self.executor.execute(&Command::list_names()) {
            ScriptOutput::Text(text) => parse_list_names(&text),
            ScriptOutput::Structured(serde_json::Value::Array(items)) => items
                .iter()
                .filter_map(|v| v.as_str().map(str::to_string))
                .collect(),
            other => {
                warn!(output = ?other, "could not read reminders lists");
                Vec::new()
            }
        }
    }

    fn create_container(&self, name: &str) -> bool {
        self.executor.execute(&Command::create_list(name)).is_success()
    }

    fn get_records(&self, container: Option<&str>) -> Vec<ReminderRecord> {
        let builder = CommandBuilder::new()
            .read(&DEFAULT_PROPERTIES)
            .index(VerbalIndex::Every)
            .in_list(container);

        let raw = match self.run(&builder) {
            ScriptOutput::Text(text) => parse_records(&text, &DEFAULT_PROPERTIES),
            ScriptOutput::Structured(value) => parse_structured(&value, &DEFAULT_PROPERTIES),
            ScriptOutput::Done | ScriptOutput::Failed => Vec::new(),
        };

        let records: Vec<ReminderRecord> = raw
            .iter()
            .filter_map(|fields| ReminderRecord::from_fields(fields, container))
            .collect();
        debug!(list = ?container, count = records.len(), "read reminders");
        records
    }

    fn create_record(&self, container: Option<&str>, properties: &Properties) -> Option<String> {
        let builder = CommandBuilder::new()
            .in_list(container)
            .create(properties.clone());

        match self.run(&builder) {
            ScriptOutput::Text(text) => {
                let id = parse_reminder_id(&text);
                if id.is_none() {
                    warn!(list = ?container, output = %text, "create returned no reminder id");
                }
                id
            }
            other => {
                warn!(list = ?container, output = ?other, "could not create reminder");
                None
            }
        }
    }

    fn update_record(&self, record: &ReminderRecord) -> bool {
        let Some(id) = record.id.as_deref() else {
            warn!(name = %record.name, "cannot update a reminder without an id");
            return false;
        };

        let mut failed = 0;
        for (property, value) in record.to_properties().iter() {
            let builder = CommandBuilder::new()
                .update(property, value.clone())
                .with_id(Some(id));
            if !self.run(&builder).is_success() {
                warn!(external_id = id, property, "could not update reminder property");
                failed += 1;
            }
        }
        failed == 0
    }
}
