//! Rendered now-playing display, independent of the platform's message builders.
//!
//! The renderer produces these values; the chat client converts them into embeds and
//! button rows when sending or editing a message.

use serenity::all::{ButtonStyle, CreateActionRow, CreateButton, CreateEmbed};

use crate::server::model::control::ControlId;

/// A single named field of the display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayField {
    pub name: String,
    pub value: String,
    pub inline: bool,
}

/// Visual content of the display message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayContent {
    pub title: String,
    pub url: Option<String>,
    pub description: String,
    pub fields: Vec<DisplayField>,
    pub thumbnail_url: Option<String>,
    pub color: u32,
}

impl DisplayContent {
    /// Looks up a field value by name.
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|field| field.name == name)
            .map(|field| field.value.as_str())
    }

    /// Characters Discord counts towards the embed's total text limit.
    pub fn text_len(&self) -> usize {
        self.title.chars().count()
            + self.description.chars().count()
            + self
                .fields
                .iter()
                .map(|field| field.name.chars().count() + field.value.chars().count())
                .sum::<usize>()
    }

    pub fn to_embed(&self) -> CreateEmbed {
        let mut embed = CreateEmbed::new()
            .title(&self.title)
            .description(&self.description)
            .color(self.color);

        if let Some(url) = &self.url {
            embed = embed.url(url);
        }
        if let Some(thumbnail) = &self.thumbnail_url {
            embed = embed.thumbnail(thumbnail);
        }
        for field in &self.fields {
            embed = embed.field(&field.name, &field.value, field.inline);
        }

        embed
    }
}

/// Visual weight of a control button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlStyle {
    Primary,
    Secondary,
    Success,
    Danger,
}

impl From<ControlStyle> for ButtonStyle {
    fn from(style: ControlStyle) -> Self {
        match style {
            ControlStyle::Primary => ButtonStyle::Primary,
            ControlStyle::Secondary => ButtonStyle::Secondary,
            ControlStyle::Success => ButtonStyle::Success,
            ControlStyle::Danger => ButtonStyle::Danger,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlButton {
    pub id: ControlId,
    pub label: &'static str,
    pub emoji: char,
    pub style: ControlStyle,
    pub disabled: bool,
}

/// Button rows attached to the display message.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ControlSurface {
    pub rows: Vec<Vec<ControlButton>>,
}

impl ControlSurface {
    /// Iterates over every button of every row.
    pub fn buttons(&self) -> impl Iterator<Item = &ControlButton> {
        self.rows.iter().flatten()
    }

    /// Returns the same layout with every button disabled.
    pub fn disabled(mut self) -> Self {
        for button in self.rows.iter_mut().flatten() {
            button.disabled = true;
        }
        self
    }

    pub fn to_action_rows(&self) -> Vec<CreateActionRow> {
        self.rows
            .iter()
            .map(|row| {
                CreateActionRow::Buttons(
                    row.iter()
                        .map(|button| {
                            CreateButton::new(button.id.encode())
                                .label(button.label)
                                .emoji(button.emoji)
                                .style(button.style.into())
                                .disabled(button.disabled)
                        })
                        .collect(),
                )
            })
            .collect()
    }
}

/// Complete output of one render: message content plus controls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NowPlayingDisplay {
    pub content: DisplayContent,
    pub controls: ControlSurface,
}
