//! Commands and menus offered to the user.
//!
//! Every layout is data: a [`TemplateSpec`] run through
//! [`apply_template`](crate::template::apply_template). Users add their own
//! through configuration; a user template with a built-in's id replaces it.

use std::collections::HashSet;

use slide_layout_protocol::CellSpec;
use slide_layout_protocol::TemplateSpec;
use tracing::debug;

use crate::error::LayoutError;
use crate::error::Result;
use crate::template::validate_template;

pub const DOCUMENTATION_URL: &str = "https://jupyterlab.readthedocs.io/en/stable/";
pub const OPEN_LINK_COMMAND: &str = "openLink";
pub const SLIDES_MENU_RANK: u32 = 300;

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Link {
        id: String,
        label: String,
        url: String,
    },
    Layout(TemplateSpec),
}

impl Command {
    pub fn id(&self) -> &str {
        match self {
            Command::Link { id, .. } => id,
            Command::Layout(template) => &template.id,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Command::Link { label, .. } => label,
            Command::Layout(template) => &template.label,
        }
    }

    pub fn caption(&self) -> &str {
        match self {
            Command::Link { label, .. } => label,
            Command::Layout(template) => template.caption(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum MenuItem {
    Command(String),
    Submenu(Menu),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Menu {
    pub label: String,
    pub rank: Option<u32>,
    pub items: Vec<MenuItem>,
}

#[derive(Debug, Clone)]
pub struct Catalog {
    commands: Vec<Command>,
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin(DOCUMENTATION_URL)
    }
}

impl Catalog {
    pub fn builtin(documentation_url: &str) -> Self {
        let mut commands = vec![Command::Link {
            id: OPEN_LINK_COMMAND.to_string(),
            label: "Documentation".to_string(),
            url: documentation_url.to_string(),
        }];
        commands.extend(builtin_layouts().into_iter().map(Command::Layout));
        Self { commands }
    }

    /// Adds user templates. A template whose id matches an existing layout
    /// replaces it in place; new ids are appended in declaration order.
    pub fn with_user_templates(mut self, templates: Vec<TemplateSpec>) -> Result<Self> {
        let mut seen = HashSet::new();
        for template in templates {
            validate_template(&template)?;
            if !seen.insert(template.id.clone()) {
                return Err(LayoutError::DuplicateTemplate(template.id));
            }

            match self.commands.iter_mut().find(|c| c.id() == template.id) {
                Some(Command::Link { id, .. }) => {
                    return Err(LayoutError::DuplicateTemplate(id.clone()));
                }
                Some(existing) => {
                    debug!(id = %template.id, "user template replaces built-in layout");
                    *existing = Command::Layout(template);
                }
                None => self.commands.push(Command::Layout(template)),
            }
        }
        Ok(self)
    }

    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    pub fn get(&self, id: &str) -> Option<&Command> {
        self.commands.iter().find(|c| c.id() == id)
    }

    pub fn layout(&self, id: &str) -> Result<&TemplateSpec> {
        match self.get(id) {
            Some(Command::Layout(template)) => Ok(template),
            Some(Command::Link { .. }) => Err(LayoutError::NotALayout(id.to_string())),
            None => Err(LayoutError::UnknownCommand(id.to_string())),
        }
    }

    pub fn layouts(&self) -> impl Iterator<Item = &TemplateSpec> {
        self.commands.iter().filter_map(|c| match c {
            Command::Layout(template) => Some(template),
            Command::Link { .. } => None,
        })
    }

    pub fn documentation_url(&self) -> Option<&str> {
        self.commands.iter().find_map(|c| match c {
            Command::Link { url, .. } => Some(url.as_str()),
            Command::Layout(_) => None,
        })
    }

    /// "Slides" menu: the documentation link, then a "Layout" submenu with
    /// every layout command.
    pub fn menu(&self) -> Menu {
        let layout = Menu {
            label: "Layout".to_string(),
            rank: None,
            items: self
                .layouts()
                .map(|t| MenuItem::Command(t.id.clone()))
                .collect(),
        };
        let mut items: Vec<MenuItem> = self
            .commands
            .iter()
            .filter(|c| matches!(c, Command::Link { .. }))
            .map(|c| MenuItem::Command(c.id().to_string()))
            .collect();
        items.push(MenuItem::Submenu(layout));

        Menu {
            label: "Slides".to_string(),
            rank: Some(SLIDES_MENU_RANK),
            items,
        }
    }
}

fn layout(id: &str, label: &str, caption: &str, cells: Vec<CellSpec>) -> TemplateSpec {
    let mut template = TemplateSpec::new(id, label, cells);
    template.caption = Some(caption.to_string());
    template
}

fn builtin_layouts() -> Vec<TemplateSpec> {
    vec![
        layout(
            "createBlankSlide",
            "Blank Slide",
            "Blank Slide",
            vec![
                CellSpec::markdown("<hr>", Some("slide")),
                CellSpec::markdown("** Body **", None),
            ],
        ),
        layout(
            "imageOnlySlide",
            "Image only",
            "Image only",
            vec![CellSpec::markdown(
                "<img src=\"../images/default.png\" width = \"100%\" title=\"default title\">",
                Some("slide"),
            )],
        ),
        layout(
            "createTitleSlide",
            "Title Slide",
            "Title Slide",
            vec![
                CellSpec::code("%%html\n<hr>", Some("skip")),
                CellSpec::markdown("# Title", Some("slide")),
            ],
        ),
        layout(
            "createSectionSlide",
            "Section Header",
            "Section header slide",
            vec![CellSpec::markdown("## Section\n\n<hr>", Some("slide"))],
        ),
        layout(
            "createTitleContentSlide",
            "Title and Content",
            "Title with bullet points revealed one by one",
            vec![
                CellSpec::markdown("## Title", Some("slide")),
                CellSpec::markdown("- Point 1", Some("fragment")),
                CellSpec::markdown("- Point 2", Some("fragment")),
            ],
        ),
        layout(
            "createTwoColumnSlide",
            "Two Columns",
            "Title with two side-by-side columns",
            vec![
                CellSpec::markdown("## Title", Some("slide")),
                CellSpec::markdown(
                    "<div style=\"display: flex;\">\n\
                     <div style=\"flex: 50%; padding: 0 1em;\">\n\n\
                     **Left**\n\n\
                     </div>\n\
                     <div style=\"flex: 50%; padding: 0 1em;\">\n\n\
                     **Right**\n\n\
                     </div>\n\
                     </div>",
                    None,
                ),
            ],
        ),
        layout(
            "createSubSlide",
            "Sub-slide",
            "Vertical slide below the current one",
            vec![CellSpec::markdown("### Sub-slide", Some("subslide"))],
        ),
        layout(
            "createSpeakerNotes",
            "Speaker Notes",
            "Notes visible only in the speaker view",
            vec![CellSpec::markdown("Speaker notes", Some("notes"))],
        ),
    ]
}
