//! Composed frames: an ordered list of draw commands tagged by layer.
//!
//! The interface never touches pixels. [`Interface::redraw`](super::Interface::redraw)
//! produces a [`Frame`] in painter's order and hands it to the host's
//! [`Display`](super::Display), which blits the referenced sprites.

use warband_types::geometry::{Point, Rect};

use super::services::Sheet;

/// Drawing layer of a command, in the order layers first appear in a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Layer {
	/// Terrain, battlefield frame and castle yard
	Cover,
	/// Hex grid and cell shades
	Grid,
	/// Drawbridge
	Bridge,
	/// Battlefield obstacles
	Object,
	/// Dead units
	Corpse,
	/// Living units
	Unit,
	/// Troop counters
	TroopCount,
	/// Spell sprites sitting on a unit
	Overlay,
	/// Castle walls, towers, gate and catapult
	Castle,
	/// Hero portraits
	Opponent,
	/// Side flags
	Flag,
	/// Missiles, bolts, clouds and other free effects
	Effect,
	/// Whole screen distortion
	Screen,
	/// Turn order strip
	ArmiesOrder,
	/// Status bar and battle log
	Status,
	/// Popup text
	Popup,
}

/// Palette applied to a sprite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Palette {
	/// Original colors
	#[default]
	Normal,
	/// Stone gray
	Gray,
	/// Mirror image tint
	Mirror,
	/// Armageddon red
	Red,
	/// Blood lust red
	BloodLust,
}

/// Extra treatment of one sprite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SpriteEffect {
	/// Drawn as is
	#[default]
	None,
	/// Whole sprite remapped
	Palette(Palette),
	/// A remapped copy blended over the sprite
	Blend {
		/// Palette of the copy
		palette: Palette,
		/// Opacity of the copy
		alpha: u8,
	},
	/// Wavy distortion of the disrupting ray
	Ripple {
		/// Phase of the wave
		frame: u32,
	},
	/// Only the leftmost columns are drawn
	Reveal {
		/// Drawn width in pixels
		width: i32,
	},
}

/// One sprite blit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpriteCommand {
	/// Sheet
	pub sheet: Sheet,
	/// Frame within the sheet
	pub frame: u32,
	/// Top left corner on screen
	pub position: Point,
	/// Mirrored horizontally
	pub reflect: bool,
	/// Opacity
	pub alpha: u8,
	/// Palette or blend treatment
	pub effect: SpriteEffect,
	/// Unit the sprite belongs to
	pub unit: Option<u32>,
}

impl SpriteCommand {
	/// An opaque, unmirrored blit.
	pub fn new(sheet: Sheet, frame: u32, position: Point) -> Self {
		Self {
			sheet,
			frame,
			position,
			reflect: false,
			alpha: u8::MAX,
			effect: SpriteEffect::None,
			unit: None,
		}
	}

	/// Mirrors the sprite.
	pub fn reflected(mut self, reflect: bool) -> Self {
		self.reflect = reflect;
		self
	}

	/// Sets the opacity.
	pub fn with_alpha(mut self, alpha: u8) -> Self {
		self.alpha = alpha;
		self
	}

	/// Sets the palette treatment.
	pub fn with_effect(mut self, effect: SpriteEffect) -> Self {
		self.effect = effect;
		self
	}

	/// Tags the sprite with its unit.
	pub fn of_unit(mut self, uid: u32) -> Self {
		self.unit = Some(uid);
		self
	}
}

/// Distortion applied to everything drawn before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenEffect {
	/// Battlefield shifted by an offset
	Shake(Point),
	/// Blurred copy blended on top
	Blur {
		/// Opacity of the blurred copy
		alpha: u8,
	},
	/// Whitened copy blended on top
	Whiten {
		/// Opacity of the white copy
		alpha: u8,
	},
	/// Battlefield remapped to a palette
	Tint(Palette),
	/// Vertical wave sweeping from left to right
	DeathWave {
		/// Leading edge of the wave
		x: i32,
		/// Amplitude of the wave
		strength: i32,
	},
}

/// Slot state of the turn order strip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderState {
	/// The active unit
	Current,
	/// Already acted this turn
	Moved,
	/// Still to act
	Waiting,
}

/// What a command draws.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawKind {
	/// A sprite
	Sprite(SpriteCommand),
	/// Outline of a sprite in a palette color
	Contour {
		/// Outlined sprite
		sprite: SpriteCommand,
		/// Palette index of the outline
		color: u8,
	},
	/// Troop counter
	TroopCount {
		/// Top left corner of the bar
		position: Point,
		/// Frame of the bar, encodes the unit's spell state
		bar: u32,
		/// Creatures in the stack
		count: u32,
	},
	/// Straight line, used by mage bolts
	Line {
		/// Start
		from: Point,
		/// End
		to: Point,
	},
	/// Lightning path revealed up to a box
	Lightning {
		/// Zigzag points
		points: Vec<Point>,
		/// Revealed part
		roi: Rect,
	},
	/// Turn order slot
	OrderSlot {
		/// Unit shown
		uid: u32,
		/// Slot box
		area: Rect,
		/// Border color
		state: OrderState,
		/// Creatures in the stack
		count: u32,
	},
	/// Text line
	Text {
		/// Top left corner
		position: Point,
		/// Content
		text: String,
	},
	/// Screen distortion
	Screen(ScreenEffect),
}

/// One draw command.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawCommand {
	/// Layer
	pub layer: Layer,
	/// Content
	pub kind: DrawKind,
}

/// A composed battlefield frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Frame {
	commands: Vec<DrawCommand>,
}

impl Frame {
	/// Creates an empty frame.
	pub fn new() -> Self {
		Self::default()
	}

	/// Appends a command.
	pub fn push(&mut self, layer: Layer, kind: DrawKind) {
		self.commands.push(DrawCommand {
			layer,
			kind,
		});
	}

	/// Appends a sprite blit.
	pub fn sprite(&mut self, layer: Layer, sprite: SpriteCommand) {
		self.push(layer, DrawKind::Sprite(sprite));
	}

	/// Commands in painter's order.
	pub fn commands(&self) -> &[DrawCommand] {
		&self.commands
	}

	/// Returns true if nothing was drawn.
	pub fn is_empty(&self) -> bool {
		self.commands.is_empty()
	}

	/// Layers in drawing order with consecutive repeats collapsed.
	pub fn layers(&self) -> Vec<Layer> {
		let mut layers: Vec<Layer> = self.commands.iter().map(|command| command.layer).collect();
		layers.dedup();
		layers
	}

	/// Sprites of a layer.
	pub fn sprites(&self, layer: Layer) -> impl Iterator<Item = &SpriteCommand> {
		self.commands.iter().filter(move |command| command.layer == layer).filter_map(|command| match &command.kind {
			DrawKind::Sprite(sprite) | DrawKind::Contour {
				sprite, ..
			} => Some(sprite),
			_ => None,
		})
	}

	/// Units in the order their sprites were drawn, contours excluded.
	pub fn unit_order(&self) -> Vec<u32> {
		self.commands
			.iter()
			.filter(|command| command.layer == Layer::Unit)
			.filter_map(|command| match &command.kind {
				DrawKind::Sprite(sprite) => sprite.unit,
				_ => None,
			})
			.collect()
	}

	/// The sprite of a unit, if drawn.
	pub fn unit_sprite(&self, uid: u32) -> Option<&SpriteCommand> {
		self.commands.iter().find_map(|command| match &command.kind {
			DrawKind::Sprite(sprite) if command.layer == Layer::Unit && sprite.unit == Some(uid) => Some(sprite),
			_ => None,
		})
	}

	/// Text lines of a layer.
	pub fn texts(&self, layer: Layer) -> Vec<&str> {
		self.commands
			.iter()
			.filter(|command| command.layer == layer)
			.filter_map(|command| match &command.kind {
				DrawKind::Text {
					text, ..
				} => Some(text.as_str()),
				_ => None,
			})
			.collect()
	}

	/// The screen distortion of the frame, if any.
	pub fn screen_effect(&self) -> Option<ScreenEffect> {
		self.commands.iter().find_map(|command| match command.kind {
			DrawKind::Screen(effect) => Some(effect),
			_ => None,
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_layers_collapse_repeats() {
		let mut frame = Frame::new();
		frame.sprite(Layer::Cover, SpriteCommand::new(Sheet::Background, 0, Point::default()));
		frame.sprite(Layer::Cover, SpriteCommand::new(Sheet::Cover, 0, Point::default()));
		frame.sprite(Layer::Grid, SpriteCommand::new(Sheet::Grid, 0, Point::default()));
		frame.sprite(Layer::Cover, SpriteCommand::new(Sheet::Foreground, 0, Point::default()));
		assert_eq!(frame.layers(), vec![Layer::Cover, Layer::Grid, Layer::Cover]);
	}

	#[test]
	fn test_unit_queries() {
		let mut frame = Frame::new();
		let sheet = Sheet::Monster(warband_types::monster::MonsterId::Peasant);
		frame.sprite(Layer::Unit, SpriteCommand::new(sheet, 1, Point::new(3, 4)).of_unit(7));
		frame.push(
			Layer::Unit,
			DrawKind::Contour {
				sprite: SpriteCommand::new(sheet, 1, Point::new(3, 4)).of_unit(7),
				color: 110,
			},
		);
		frame.sprite(Layer::Unit, SpriteCommand::new(sheet, 1, Point::new(50, 4)).of_unit(2));
		assert_eq!(frame.unit_order(), vec![7, 2]);
		assert_eq!(frame.unit_sprite(2).map(|sprite| sprite.position), Some(Point::new(50, 4)));
		assert_eq!(frame.sprites(Layer::Unit).count(), 3);
	}
}
