use crossterm::style::Color as TermColor;
use strum::IntoEnumIterator;
use strum_macros::{EnumIter, IntoStaticStr};

use crate::error::DefinitionError;
use crate::stt::{ChoiceEntry, Slot};

/// The colors the user can pick as their favorite.
///
/// Each color is recognized by its lowercase name and reported with its numeric code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, IntoStaticStr)]
#[repr(i32)]
pub enum Color {
    #[allow(missing_docs)]
    Red = 1,
    #[allow(missing_docs)]
    Green = 2,
    #[allow(missing_docs)]
    Blue = 3,
}

impl Color {
    /// The semantic value a recognized color resolves to.
    pub fn code(self) -> i32 {
        self as i32
    }

    /// Looks up the color with the given semantic value.
    pub fn from_code(code: i32) -> Option<Self> {
        Self::iter().find(|color| color.code() == code)
    }

    /// The name of the color, as displayed and spoken back to the user.
    pub fn label(self) -> &'static str {
        self.into()
    }

    /// The console color used to highlight output once this color is picked.
    pub fn style(self) -> TermColor {
        match self {
            Self::Red => TermColor::Red,
            Self::Green => TermColor::Green,
            Self::Blue => TermColor::Blue,
        }
    }

    /// A choice set of every color, keyed by its lowercase name.
    pub fn choice_slot() -> Result<Slot<'static>, DefinitionError> {
        Slot::choice(
            Self::iter().map(|color| ChoiceEntry::new(color.label().to_lowercase(), color.code())),
        )
    }
}
