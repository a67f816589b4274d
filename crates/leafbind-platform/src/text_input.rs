//! Text input model
//!
//! Headless bookkeeping for on-screen text fields. Inputs are addressed by
//! sequential integer ids starting at 1; ids are never reused.

use std::fmt;
use std::str::FromStr;

use leafbind_sdk::BindingError;
use rustc_hash::FxHashMap;

/// Errors raised by the text input manager
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TextInputError {
    /// No live input has this id
    #[error("no text input with id {0}")]
    UnknownId(i32),

    /// Unrecognised input type name
    #[error("unknown text input type '{0}'")]
    UnknownType(String),

    /// Scale factors must be positive and finite
    #[error("invalid scale {0}")]
    InvalidScale(f32),
}

impl From<TextInputError> for BindingError {
    fn from(e: TextInputError) -> Self {
        BindingError::Runtime(e.to_string())
    }
}

// ============================================================================
// Geometry and type
// ============================================================================

/// Position and size in script coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    /// Left edge
    pub x: f32,
    /// Top edge
    pub y: f32,
    /// Horizontal extent
    pub width: f32,
    /// Vertical extent
    pub height: f32,
}

impl Rect {
    /// Rectangle from its origin and size
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    /// Every component multiplied by `factor`
    pub fn scaled(self, factor: f32) -> Self {
        Self {
            x: self.x * factor,
            y: self.y * factor,
            width: self.width * factor,
            height: self.height * factor,
        }
    }
}

/// Keyboard flavour of an input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputType {
    /// Free text (`""` or `"text"`)
    #[default]
    Text,
    /// Numeric keypad
    Number,
    /// Masked entry
    Password,
    /// E-mail address
    Email,
    /// Web address
    Url,
    /// Phone number (`"phone"` or `"tel"`)
    Phone,
}

impl InputType {
    /// Script-facing name
    pub fn as_str(self) -> &'static str {
        match self {
            InputType::Text => "text",
            InputType::Number => "number",
            InputType::Password => "password",
            InputType::Email => "email",
            InputType::Url => "url",
            InputType::Phone => "phone",
        }
    }
}

impl FromStr for InputType {
    type Err = TextInputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" | "" => Ok(InputType::Text),
            "number" => Ok(InputType::Number),
            "password" => Ok(InputType::Password),
            "email" => Ok(InputType::Email),
            "url" => Ok(InputType::Url),
            "phone" | "tel" => Ok(InputType::Phone),
            _ => Err(TextInputError::UnknownType(s.to_string())),
        }
    }
}

impl fmt::Display for InputType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// TextInput
// ============================================================================

/// One text field
#[derive(Debug, Clone, PartialEq)]
pub struct TextInput {
    id: i32,
    frame: Rect,
    text: String,
    input_type: InputType,
    focused: bool,
    scale: f32,
    text_scale: f32,
}

impl TextInput {
    fn new(id: i32, frame: Rect, text: String, scale: f32, text_scale: f32) -> Self {
        Self {
            id,
            frame,
            text,
            input_type: InputType::default(),
            focused: false,
            scale,
            text_scale,
        }
    }

    /// Manager-assigned id
    pub fn id(&self) -> i32 {
        self.id
    }

    /// Frame in script coordinates
    pub fn frame(&self) -> Rect {
        self.frame
    }

    /// Frame in device pixels
    pub fn screen_frame(&self) -> Rect {
        self.frame.scaled(self.scale)
    }

    /// Current contents
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Replace the contents
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    /// Keyboard flavour
    pub fn input_type(&self) -> InputType {
        self.input_type
    }

    /// Change the keyboard flavour
    pub fn set_type(&mut self, input_type: InputType) {
        self.input_type = input_type;
    }

    /// Whether this input holds the keyboard focus
    pub fn is_focused(&self) -> bool {
        self.focused
    }

    /// Display scale factor
    pub fn scale(&self) -> f32 {
        self.scale
    }

    /// Font scale factor
    pub fn text_scale(&self) -> f32 {
        self.text_scale
    }

    /// Move the origin, keeping the size
    pub fn set_position(&mut self, x: f32, y: f32) {
        self.frame.x = x;
        self.frame.y = y;
    }

    /// Resize, keeping the origin
    pub fn set_dimensions(&mut self, width: f32, height: f32) {
        self.frame.width = width;
        self.frame.height = height;
    }
}

// ============================================================================
// TextInputManager
// ============================================================================

/// Owns every live text input
#[derive(Debug)]
pub struct TextInputManager {
    inputs: FxHashMap<i32, TextInput>,
    next_id: i32,
    scale: f32,
    text_scale: f32,
}

impl Default for TextInputManager {
    fn default() -> Self {
        Self::new()
    }
}

impl TextInputManager {
    /// Empty manager with unit scale factors
    pub fn new() -> Self {
        Self {
            inputs: FxHashMap::default(),
            next_id: 1,
            scale: 1.0,
            text_scale: 1.0,
        }
    }

    /// Manager whose inputs are created with the given scale factors
    pub fn with_scale(scale: f32, text_scale: f32) -> Result<Self, TextInputError> {
        let mut manager = Self::new();
        manager.set_scale(scale)?;
        manager.set_text_scale(text_scale)?;
        Ok(manager)
    }

    /// Create an input and return its id
    pub fn add_text_input(&mut self, x: i32, y: i32, width: i32, height: i32, text: &str) -> i32 {
        let id = self.next_id;
        self.next_id += 1;
        let frame = Rect::new(x as f32, y as f32, width as f32, height as f32);
        self.inputs.insert(
            id,
            TextInput::new(id, frame, text.to_string(), self.scale, self.text_scale),
        );
        tracing::debug!(id, x, y, width, height, "text input created");
        id
    }

    /// Input with `id`, if it is live
    pub fn get(&self, id: i32) -> Option<&TextInput> {
        self.inputs.get(&id)
    }

    /// Mutable input with `id`, if it is live
    pub fn get_mut(&mut self, id: i32) -> Option<&mut TextInput> {
        self.inputs.get_mut(&id)
    }

    /// Like [`get_mut`](Self::get_mut) but unknown ids are an error
    pub fn input_mut(&mut self, id: i32) -> Result<&mut TextInput, TextInputError> {
        self.inputs.get_mut(&id).ok_or(TextInputError::UnknownId(id))
    }

    /// Whether `id` is live
    pub fn contains(&self, id: i32) -> bool {
        self.inputs.contains_key(&id)
    }

    /// Remove an input. Returns false if it was already gone.
    pub fn destroy(&mut self, id: i32) -> bool {
        let removed = self.inputs.remove(&id).is_some();
        if removed {
            tracing::debug!(id, "text input destroyed");
        }
        removed
    }

    /// Give `id` the keyboard focus, taking it from every other input
    pub fn focus(&mut self, id: i32) -> Result<(), TextInputError> {
        if !self.inputs.contains_key(&id) {
            return Err(TextInputError::UnknownId(id));
        }
        for input in self.inputs.values_mut() {
            input.focused = input.id == id;
        }
        Ok(())
    }

    /// Drop the focus of every input. Returns how many were focused.
    pub fn dismiss_all(&mut self) -> usize {
        let mut dismissed = 0;
        for input in self.inputs.values_mut() {
            if input.focused {
                input.focused = false;
                dismissed += 1;
            }
        }
        dismissed
    }

    /// Remove every input. Returns how many there were.
    pub fn destroy_all(&mut self) -> usize {
        let count = self.inputs.len();
        self.inputs.clear();
        tracing::debug!(count, "all text inputs destroyed");
        count
    }

    /// Live ids in ascending order
    pub fn ids(&self) -> Vec<i32> {
        let mut ids: Vec<i32> = self.inputs.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// Number of live inputs
    pub fn len(&self) -> usize {
        self.inputs.len()
    }

    /// True when no input is live
    pub fn is_empty(&self) -> bool {
        self.inputs.is_empty()
    }

    /// Display scale factor
    pub fn scale(&self) -> f32 {
        self.scale
    }

    /// Font scale factor
    pub fn text_scale(&self) -> f32 {
        self.text_scale
    }

    /// Display scale, applied to existing inputs too
    pub fn set_scale(&mut self, scale: f32) -> Result<(), TextInputError> {
        check_scale(scale)?;
        self.scale = scale;
        for input in self.inputs.values_mut() {
            input.scale = scale;
        }
        Ok(())
    }

    /// Font scale, applied to existing inputs too
    pub fn set_text_scale(&mut self, text_scale: f32) -> Result<(), TextInputError> {
        check_scale(text_scale)?;
        self.text_scale = text_scale;
        for input in self.inputs.values_mut() {
            input.text_scale = text_scale;
        }
        Ok(())
    }
}

fn check_scale(scale: f32) -> Result<(), TextInputError> {
    if scale.is_finite() && scale > 0.0 {
        Ok(())
    } else {
        Err(TextInputError::InvalidScale(scale))
    }
}
