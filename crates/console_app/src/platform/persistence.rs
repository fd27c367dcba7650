use std::path::Path;

use console_core::{ContextId, DisplayOptions, SessionSnapshot};
use console_engine::{read_optional, AtomicFileWriter};
use console_logging::{console_error, console_info, console_warn};
use serde::{Deserialize, Serialize};

const STATE_FILENAME: &str = ".agent_console_state.ron";

#[derive(Debug, Clone, Serialize, Deserialize)]
struct PersistedDisplay {
    auto_scroll: bool,
    show_json: bool,
    show_thoughts: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct PersistedSession {
    #[serde(default)]
    context: Option<String>,
    display: PersistedDisplay,
}

pub(crate) fn load_session(state_dir: &Path) -> Option<SessionSnapshot> {
    let path = state_dir.join(STATE_FILENAME);
    let content = match read_optional(&path) {
        Ok(Some(text)) => text,
        Ok(None) => return None,
        Err(err) => {
            console_warn!("Failed to read session from {:?}: {}", path, err);
            return None;
        }
    };

    let persisted: PersistedSession = match ron::from_str(&content) {
        Ok(session) => session,
        Err(err) => {
            console_warn!("Failed to parse session from {:?}: {}", path, err);
            return None;
        }
    };

    console_info!("Restored session from {:?}", path);
    Some(SessionSnapshot {
        context: persisted
            .context
            .filter(|id| !id.is_empty())
            .map(ContextId::from),
        display: DisplayOptions {
            auto_scroll: persisted.display.auto_scroll,
            show_json: persisted.display.show_json,
            show_thoughts: persisted.display.show_thoughts,
        },
    })
}

pub(crate) fn save_session(state_dir: &Path, session: &SessionSnapshot) {
    let persisted = PersistedSession {
        context: session.context.as_ref().map(|id| id.as_str().to_string()),
        display: PersistedDisplay {
            auto_scroll: session.display.auto_scroll,
            show_json: session.display.show_json,
            show_thoughts: session.display.show_thoughts,
        },
    };

    let pretty = ron::ser::PrettyConfig::new();
    let content = match ron::ser::to_string_pretty(&persisted, pretty) {
        Ok(text) => text,
        Err(err) => {
            console_error!("Failed to serialize session: {}", err);
            return;
        }
    };

    let writer = AtomicFileWriter::new(state_dir.to_path_buf());
    if let Err(err) = writer.write(STATE_FILENAME, &content) {
        console_error!("Failed to write session to {:?}: {}", state_dir, err);
    }
}
