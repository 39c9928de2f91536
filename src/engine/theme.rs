use serde::{Deserialize, Serialize};

/// Dashboard appearance. Only affects chart chrome colours, never values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

/// Axis text and grid colours passed alongside the chart values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ChartStyle {
    pub text_color: &'static str,
    pub grid_color: &'static str,
}

impl Theme {
    pub fn chart_style(self) -> ChartStyle {
        match self {
            Theme::Dark => ChartStyle {
                text_color: "#e6edf3",
                grid_color: "#30363d",
            },
            Theme::Light => ChartStyle {
                text_color: "#000000",
                grid_color: "#d5d5d5",
            },
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Dark => "dark",
            Theme::Light => "light",
        }
    }
}
