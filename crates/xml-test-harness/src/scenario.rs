//! Reference manipulation scenarios.
//!
//! Each scenario builds a small tree, watches some of its nodes with a
//! [`TraceRecorder`] and performs a fixed sequence of mutations. The
//! recorded trace is the expected behaviour of the tree, line for line.

use strum::IntoEnumIterator;
use tracing::info;
use xml_tree::{Result, Tree};

use crate::report::TraceReport;
use crate::trace::{TraceEntry, TraceRecorder};

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[strum(serialize_all = "kebab-case")]
pub enum ScenarioName {
    ExplicitClone,
    ImplicitClone,
    Manipulate,
    SetAttributeValue,
    SetElementValue,
    Annotation,
}

impl ScenarioName {
    pub fn all() -> impl Iterator<Item = ScenarioName> {
        Self::iter()
    }

    pub fn description(self) -> &'static str {
        match self {
            ScenarioName::ExplicitClone => "clone_node gives a distinct but deep-equal tree",
            ScenarioName::ImplicitClone => "attaching an attached node, or a node to itself, copies it",
            ScenarioName::Manipulate => "parent and child subscribers across every mutation kind",
            ScenarioName::SetAttributeValue => "set_attribute_value adds, updates, then removes",
            ScenarioName::SetElementValue => "set_child_element_value adds, updates, then removes",
            ScenarioName::Annotation => "annotations follow the top-level clone only",
        }
    }

    pub fn run(self) -> Result<ScenarioOutcome> {
        let mut outcome = ScenarioOutcome::new(self);
        match self {
            ScenarioName::ExplicitClone => explicit_clone(&mut outcome)?,
            ScenarioName::ImplicitClone => implicit_clone(&mut outcome)?,
            ScenarioName::Manipulate => manipulate(&mut outcome)?,
            ScenarioName::SetAttributeValue => set_attribute_value(&mut outcome)?,
            ScenarioName::SetElementValue => set_element_value(&mut outcome)?,
            ScenarioName::Annotation => annotation(&mut outcome)?,
        }
        info!(
            scenario = %self,
            notifications = outcome.entries.len(),
            "scenario finished"
        );
        Ok(outcome)
    }
}

/// What a scenario recorded
#[derive(Debug, Clone)]
pub struct ScenarioOutcome {
    pub name: ScenarioName,
    pub entries: Vec<TraceEntry>,
    /// Observations made outside the trace, as `label: value` lines
    pub notes: Vec<String>,
}

impl ScenarioOutcome {
    fn new(name: ScenarioName) -> Self {
        Self {
            name,
            entries: Vec::new(),
            notes: Vec::new(),
        }
    }

    fn note(&mut self, label: &str, value: impl ToString) {
        self.notes.push(format!("{}: {}", label, value.to_string()));
    }

    /// The trace rendered one entry per line
    pub fn lines(&self) -> Vec<String> {
        self.entries.iter().map(ToString::to_string).collect()
    }

    pub fn into_report(self) -> TraceReport {
        TraceReport::new(&self.name.to_string(), self.entries, self.notes)
    }
}

fn explicit_clone(outcome: &mut ScenarioOutcome) -> Result<()> {
    let mut tree = Tree::new();
    let source = tree.new_element("element")?;
    let cloned = tree.clone_node(source);
    outcome.note("cloned element", tree.to_xml(cloned));

    let text = tree.new_text("text");
    let cloned_text = tree.clone_node(text);
    outcome.note("cloned text", tree.to_xml(cloned_text));

    let channel = tree.new_element("channel")?;
    tree.set_attribute_value(channel, "version", Some("2.0"))?;
    tree.set_child_element_value(channel, "title", Some("Dixin's Blog"))?;
    tree.add_child(channel, text)?;
    let cloned_channel = tree.clone_node(channel);
    outcome.note("same node", cloned_channel == channel);
    outcome.note("deep equal", tree.deep_equal(channel, cloned_channel));
    Ok(())
}

fn implicit_clone(outcome: &mut ScenarioOutcome) -> Result<()> {
    let mut tree = Tree::new();
    let child = tree.new_element("child")?;

    let parent1 = tree.new_element("parent")?;
    let attached = tree.add_child(parent1, child)?;
    outcome.note("first attach keeps the node", attached == child);

    let parent2 = tree.new_element("parent")?;
    let attached = tree.add_child(parent2, child)?;
    outcome.note("second attach keeps the node", attached == child);
    outcome.note("original still under first parent", tree.parent(child) == Some(parent1));

    let element = tree.new_element("element")?;
    let attached = tree.add_child(element, element)?;
    outcome.note("self add keeps the node", attached == element);
    outcome.note("self add result", tree.to_xml(element));
    Ok(())
}

fn manipulate(outcome: &mut ScenarioOutcome) -> Result<()> {
    let mut tree = Tree::new();
    let recorder = TraceRecorder::new();
    let child = tree.new_element("child")?;
    recorder.watch(&mut tree, child);
    let parent = tree.new_element("parent")?;
    recorder.watch(&mut tree, parent);

    tree.set_value(child, "value1")?;
    tree.set_value(child, "value2")?;
    tree.set_value(child, "")?;

    let attached = tree.add_child(parent, child)?;
    outcome.note("child attached without copy", attached == child);

    let attribute = tree.new_attribute("attribute", "value")?;
    tree.add_child(child, attribute)?;

    let zero = tree.new_text("0");
    tree.add_sibling_before(child, zero)?;

    let text = tree.new_text("Text.");
    tree.replace_all_children(parent, &[text])?;

    tree.set_name(parent, "name")?;

    let before_clone = recorder.len();
    let cloned = tree.clone_node(child);
    tree.set_value(cloned, "2016-01-01T00:00:00")?;
    outcome.note("clone changes traced", recorder.len() - before_clone);

    outcome.entries = recorder.take();
    Ok(())
}

fn set_attribute_value(outcome: &mut ScenarioOutcome) -> Result<()> {
    let mut tree = Tree::new();
    let recorder = TraceRecorder::new();
    let element = tree.new_element("element")?;
    recorder.watch(&mut tree, element);

    tree.set_attribute_value(element, "attribute", Some("value1"))?;
    tree.set_attribute_value(element, "attribute", Some("value2"))?;
    tree.set_attribute_value(element, "attribute", None)?;

    outcome.entries = recorder.take();
    Ok(())
}

fn set_element_value(outcome: &mut ScenarioOutcome) -> Result<()> {
    let mut tree = Tree::new();
    let recorder = TraceRecorder::new();
    let parent = tree.new_element("parent")?;
    recorder.watch(&mut tree, parent);

    tree.set_child_element_value(parent, "child", Some(""))?;
    tree.set_child_element_value(parent, "child", Some("value"))?;
    tree.set_child_element_value(parent, "child", None)?;

    outcome.entries = recorder.take();
    Ok(())
}

#[derive(Debug)]
struct Link(&'static str);

fn annotation(outcome: &mut ScenarioOutcome) -> Result<()> {
    let mut tree = Tree::new();
    let element = tree.new_element("element")?;
    tree.add_annotation(element, Link("https://microsoft.com"));

    let link = tree.annotation::<Link>(element).map(|l| l.0).unwrap_or("none");
    outcome.note("annotation", link);
    outcome.note("element", tree.to_xml(element));

    let cloned = tree.add_child(element, element)?;
    outcome.note("annotations on element", tree.annotations_of_type::<Link>(element).count());
    outcome.note("annotations on clone", tree.annotations_of_type::<Link>(cloned).count());
    let below_clone: usize = tree
        .descendants_and_self(cloned)
        .into_iter()
        .skip(1)
        .map(|n| tree.annotation_count(n))
        .sum();
    outcome.note("annotations below clone", below_clone);

    tree.remove_annotations_of_type::<Link>(element);
    outcome.note(
        "annotations after removal",
        tree.annotations_of_type::<Link>(element).count(),
    );
    outcome.note("removed", tree.annotation::<Link>(element).is_none());
    Ok(())
}
