//! Tool registry - the fixed set of wrapped code-quality tools
//!
//! Every supported tool is a variant of [`Tool`]; its static settings live in
//! a [`ToolSpec`] looked up through [`Tool::spec`]. The registry order
//! (`black, isort, flake8, ruff, mypy, ty, pyright`) is the order tools are
//! offered, run and presented in.

use console::Style;

use crate::heuristic::Heuristic;

/// A wrapped code-quality tool
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Tool {
    /// Formatter
    Black,
    /// Import sorter
    Isort,
    /// Linter
    Flake8,
    /// Linter
    Ruff,
    /// Type checker
    Mypy,
    /// Type checker
    Ty,
    /// Type checker
    Pyright,
}

impl Tool {
    /// Get all tools in registry order
    pub fn all() -> &'static [Tool] {
        &[
            Self::Black,
            Self::Isort,
            Self::Flake8,
            Self::Ruff,
            Self::Mypy,
            Self::Ty,
            Self::Pyright,
        ]
    }

    /// Module/executable name, also used as the CLI flag name
    pub fn name(&self) -> &'static str {
        match self {
            Self::Black => "black",
            Self::Isort => "isort",
            Self::Flake8 => "flake8",
            Self::Ruff => "ruff",
            Self::Mypy => "mypy",
            Self::Ty => "ty",
            Self::Pyright => "pyright",
        }
    }

    /// Title-cased name used in report headings
    pub fn title(&self) -> String {
        let name = self.name();
        let mut chars = name.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }

    /// Parse a tool from its name
    pub fn from_name(s: &str) -> Option<Self> {
        Self::all().iter().copied().find(|t| t.name() == s)
    }

    /// Static settings for this tool
    pub fn spec(&self) -> &'static ToolSpec {
        match self {
            Self::Black => &BLACK,
            Self::Isort => &ISORT,
            Self::Flake8 => &FLAKE8,
            Self::Ruff => &RUFF,
            Self::Mypy => &MYPY,
            Self::Ty => &TY,
            Self::Pyright => &PYRIGHT,
        }
    }
}

impl std::fmt::Display for Tool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Header style for a tool's summary section
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Markup {
    Red,
    Green,
    Cyan,
    Purple,
}

impl Markup {
    /// Terminal style for this markup
    pub fn style(&self) -> Style {
        match self {
            Self::Red => Style::new().red(),
            Self::Green => Style::new().green(),
            Self::Cyan => Style::new().cyan(),
            Self::Purple => Style::new().magenta(),
        }
    }
}

/// Immutable per-tool settings
#[derive(Debug)]
pub struct ToolSpec {
    pub tool: Tool,
    /// Arguments placed between the launcher and the project root
    pub flags: &'static [&'static str],
    pub markup: Markup,
    pub heuristic: Heuristic,
    /// Appended to the stored output when no failure is detected
    pub success_note: Option<&'static str>,
    /// Colour-forcing variables beyond the generic `FORCE_COLOR`
    pub color_env: &'static [(&'static str, &'static str)],
    /// Help text for the CLI flag
    pub help: &'static str,
}

static BLACK: ToolSpec = ToolSpec {
    tool: Tool::Black,
    flags: &["--diff", "--color"],
    markup: Markup::Cyan,
    heuristic: Heuristic::DiffMarker,
    success_note: None,
    color_env: &[],
    help: "Enable `black --diff`",
};

static ISORT: ToolSpec = ToolSpec {
    tool: Tool::Isort,
    flags: &["--diff", "--color"],
    markup: Markup::Cyan,
    heuristic: Heuristic::DiffMarker,
    success_note: Some("All done.\n"),
    color_env: &[],
    help: "Enable `isort --diff`",
};

static FLAKE8: ToolSpec = ToolSpec {
    tool: Tool::Flake8,
    flags: &["--color=always"],
    markup: Markup::Purple,
    heuristic: Heuristic::ExitCode,
    success_note: Some("All done.\n"),
    color_env: &[],
    help: "Enable `flake8`",
};

static RUFF: ToolSpec = ToolSpec {
    tool: Tool::Ruff,
    flags: &["check"],
    markup: Markup::Purple,
    heuristic: Heuristic::ExitCode,
    success_note: None,
    color_env: &[],
    help: "Enable `ruff check`",
};

static MYPY: ToolSpec = ToolSpec {
    tool: Tool::Mypy,
    flags: &[],
    markup: Markup::Green,
    heuristic: Heuristic::ErrorCount,
    success_note: None,
    color_env: &[("MYPY_FORCE_COLOR", "1")],
    help: "Enable `mypy`",
};

static TY: ToolSpec = ToolSpec {
    tool: Tool::Ty,
    flags: &["check"],
    markup: Markup::Green,
    heuristic: Heuristic::ExitCode,
    success_note: None,
    color_env: &[],
    help: "Enable `ty check`",
};

static PYRIGHT: ToolSpec = ToolSpec {
    tool: Tool::Pyright,
    flags: &[],
    markup: Markup::Green,
    heuristic: Heuristic::ExitCode,
    success_note: None,
    color_env: &[],
    help: "Enable `pyright`",
};
