use serde_json::{Map, Value};

/// Saved, reusable task definition. An empty `id` marks a template the
/// backend has not stored yet.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Template {
    pub id: String,
    pub name: String,
    pub url: String,
    pub navigation_goal: String,
    pub data_extraction_goal: String,
    pub advanced_settings: Map<String, Value>,
}

impl Template {
    pub fn is_new(&self) -> bool {
        self.id.trim().is_empty()
    }

    pub fn field(&self, field: TemplateField) -> &str {
        match field {
            TemplateField::Name => &self.name,
            TemplateField::Url => &self.url,
            TemplateField::NavigationGoal => &self.navigation_goal,
            TemplateField::DataExtractionGoal => &self.data_extraction_goal,
        }
    }

    pub fn set_field(&mut self, field: TemplateField, value: String) {
        match field {
            TemplateField::Name => self.name = value,
            TemplateField::Url => self.url = value,
            TemplateField::NavigationGoal => self.navigation_goal = value,
            TemplateField::DataExtractionGoal => self.data_extraction_goal = value,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TemplateField {
    Name,
    Url,
    NavigationGoal,
    DataExtractionGoal,
}

impl TemplateField {
    pub const ALL: [TemplateField; 4] = [
        TemplateField::Name,
        TemplateField::Url,
        TemplateField::NavigationGoal,
        TemplateField::DataExtractionGoal,
    ];

    pub fn label(self) -> &'static str {
        match self {
            TemplateField::Name => "Template Name",
            TemplateField::Url => "URL",
            TemplateField::NavigationGoal => "Navigation Goal",
            TemplateField::DataExtractionGoal => "Data Extraction Goal",
        }
    }

    /// Goals are free text; name and URL are single line.
    pub fn multiline(self) -> bool {
        matches!(
            self,
            TemplateField::NavigationGoal | TemplateField::DataExtractionGoal
        )
    }

    pub fn next(self) -> Self {
        match self {
            TemplateField::Name => TemplateField::Url,
            TemplateField::Url => TemplateField::NavigationGoal,
            TemplateField::NavigationGoal => TemplateField::DataExtractionGoal,
            TemplateField::DataExtractionGoal => TemplateField::Name,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            TemplateField::Name => TemplateField::DataExtractionGoal,
            TemplateField::Url => TemplateField::Name,
            TemplateField::NavigationGoal => TemplateField::Url,
            TemplateField::DataExtractionGoal => TemplateField::NavigationGoal,
        }
    }
}

/// The open create/edit form.
#[derive(Debug, Clone, PartialEq)]
pub struct TemplateForm {
    pub draft: Template,
    pub focused: TemplateField,
}

impl TemplateForm {
    pub fn new(draft: Template) -> Self {
        Self {
            draft,
            focused: TemplateField::Name,
        }
    }

    pub fn title(&self) -> &'static str {
        if self.draft.is_new() {
            "New Template"
        } else {
            "Edit Template"
        }
    }
}

/// Question waiting for a yes/no answer before an effect is issued.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Confirmation {
    DeleteTemplate { id: String, name: String },
}

impl Confirmation {
    pub fn prompt(&self) -> String {
        match self {
            Confirmation::DeleteTemplate { name, .. } if !name.is_empty() => {
                format!("Are you sure you want to delete the template \"{name}\"?")
            }
            Confirmation::DeleteTemplate { .. } => {
                "Are you sure you want to delete this template?".to_string()
            }
        }
    }
}
