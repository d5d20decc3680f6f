use shimmer_params::{NumericRange, ParamHandle, ParamValue, ParameterRegistry};

/// Errors from panel lookups.
#[derive(Debug, thiserror::Error)]
pub enum PanelError {
    #[error("no control labeled '{0}'")]
    UnknownControl(String),
}

/// One interactive widget: a label shown to the user, the parameter it
/// edits, and the range the widget displays (sliders only).
#[derive(Debug, Clone)]
pub struct Control {
    pub label: String,
    pub param: ParamHandle,
    pub display: Option<NumericRange>,
}

/// A labeled group of controls. Grouping is presentation-only.
#[derive(Debug, Default)]
pub struct Folder {
    pub label: String,
    controls: Vec<Control>,
}

impl Folder {
    /// Add a widget editing `param`.
    pub fn add_control(
        &mut self,
        label: &str,
        param: ParamHandle,
        display: Option<NumericRange>,
    ) -> &mut Self {
        tracing::debug!(folder = %self.label, label, "control added");
        self.controls.push(Control {
            label: label.to_string(),
            param,
            display,
        });
        self
    }

    pub fn controls(&self) -> &[Control] {
        &self.controls
    }
}

/// The interactive control surface for one scene.
///
/// Controls live either at the root or inside labeled folders; all lookups
/// and listings preserve insertion order.
#[derive(Debug)]
pub struct ControlPanel {
    title: String,
    root: Folder,
    folders: Vec<Folder>,
}

impl ControlPanel {
    pub fn new(title: &str) -> Self {
        Self {
            title: title.to_string(),
            root: Folder::default(),
            folders: Vec::new(),
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Add a widget at the panel root.
    pub fn add_control(
        &mut self,
        label: &str,
        param: ParamHandle,
        display: Option<NumericRange>,
    ) -> &mut Self {
        self.root.add_control(label, param, display);
        self
    }

    /// Get or create the folder with the given label.
    pub fn folder(&mut self, label: &str) -> &mut Folder {
        if let Some(idx) = self.folders.iter().position(|f| f.label == label) {
            return &mut self.folders[idx];
        }
        let idx = self.folders.len();
        self.folders.push(Folder {
            label: label.to_string(),
            controls: Vec::new(),
        });
        &mut self.folders[idx]
    }

    /// All controls, root first, then folder by folder, in insertion order.
    pub fn controls(&self) -> impl Iterator<Item = &Control> {
        self.root
            .controls
            .iter()
            .chain(self.folders.iter().flat_map(|f| f.controls.iter()))
    }

    /// Find a control by its widget label. The first match wins, searching
    /// root controls before folders.
    pub fn find(&self, label: &str) -> Result<&Control, PanelError> {
        self.controls()
            .find(|c| c.label == label)
            .ok_or_else(|| PanelError::UnknownControl(label.to_string()))
    }

    /// Render the panel and current values as indented text, one line per
    /// control.
    pub fn render_text(&self, registry: &ParameterRegistry) -> String {
        let mut out = String::new();
        out.push_str(&format!("== {} ==\n", self.title));
        for control in self.root.controls() {
            out.push_str(&render_control(control, registry, 1));
        }
        for folder in &self.folders {
            out.push_str(&format!("  [{}]\n", folder.label));
            for control in folder.controls() {
                out.push_str(&render_control(control, registry, 2));
            }
        }
        out
    }
}

fn render_control(control: &Control, registry: &ParameterRegistry, indent: usize) -> String {
    let value = match registry.get(control.param) {
        Ok(ParamValue::Text(s)) | Ok(ParamValue::Choice(s)) => format!("\"{s}\""),
        Ok(ParamValue::Float(v)) => format!("{v:.2}"),
        Ok(ParamValue::Int(v)) => v.to_string(),
        Ok(ParamValue::Bool(v)) => v.to_string(),
        Ok(ParamValue::Color(c)) => {
            format!("rgb({:.2}, {:.2}, {:.2})", c.r, c.g, c.b)
        }
        Err(_) => "<unbound>".to_string(),
    };
    let range = match control.display {
        Some(r) => format!(" [{}..{}]", r.min, r.max),
        None => String::new(),
    };
    format!("{}{}: {}{}\n", "  ".repeat(indent), control.label, value, range)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> (ParameterRegistry, ParamHandle, ParamHandle) {
        let mut registry = ParameterRegistry::new();
        let message = registry
            .register("message", ParamValue::Text("lil-gui".into()))
            .unwrap();
        let height = registry
            .register_number("height", 50.0, NumericRange::new(0.0, 200.0))
            .unwrap();
        (registry, message, height)
    }

    #[test]
    fn find_by_label() {
        let (_registry, message, height) = registry();
        let mut panel = ControlPanel::new("shimmer");
        panel.add_control("message", message, None);
        panel
            .folder("Geometry")
            .add_control("depth", height, Some(NumericRange::new(0.0, 200.0)));

        assert_eq!(panel.find("depth").unwrap().param, height);
        assert!(matches!(
            panel.find("nope"),
            Err(PanelError::UnknownControl(_))
        ));
    }

    #[test]
    fn folders_are_reused_by_label() {
        let (_registry, message, height) = registry();
        let mut panel = ControlPanel::new("shimmer");
        panel.folder("Geometry").add_control("depth", height, None);
        panel.folder("Geometry").add_control("message", message, None);

        assert_eq!(panel.folder("Geometry").controls().len(), 2);
    }

    #[test]
    fn controls_iterate_in_insertion_order() {
        let (_registry, message, height) = registry();
        let mut panel = ControlPanel::new("shimmer");
        panel.add_control("message", message, None);
        panel.folder("Geometry").add_control("depth", height, None);

        let labels: Vec<_> = panel.controls().map(|c| c.label.as_str()).collect();
        assert_eq!(labels, vec!["message", "depth"]);
    }

    #[test]
    fn render_text_shows_current_values() {
        let (registry, message, height) = registry();
        let mut panel = ControlPanel::new("shimmer");
        panel.add_control("message", message, None);
        panel
            .folder("Geometry")
            .add_control("depth", height, Some(NumericRange::new(0.0, 200.0)));

        let text = panel.render_text(&registry);
        assert!(text.contains("message: \"lil-gui\""));
        assert!(text.contains("[Geometry]"));
        assert!(text.contains("depth: 50.00 [0..200]"));
    }
}
