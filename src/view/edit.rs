use crate::model::{EditableFields, Role, UserRecord};

/// A single change to the inline edit form.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EditField {
    Name(String),
    Email(String),
    Role(Role),
}

/// At most one record is being edited at a time.
#[derive(Clone, Debug, Default)]
pub struct EditSession {
    editing_id: Option<u32>,
    form: EditableFields,
}

impl EditSession {
    pub fn start(&mut self, record: &UserRecord) {
        self.editing_id = Some(record.id);
        self.form = record.editable_fields();
    }

    pub fn cancel(&mut self) {
        self.editing_id = None;
        self.form = EditableFields::default();
    }

    pub fn update(&mut self, field: EditField) {
        match field {
            EditField::Name(v) => self.form.name = v,
            EditField::Email(v) => self.form.email = v,
            EditField::Role(r) => self.form.role = r,
        }
    }

    pub fn editing_id(&self) -> Option<u32> {
        self.editing_id
    }

    pub fn form(&self) -> &EditableFields {
        &self.form
    }
}
