//! Moving the viewport around: the command table the interactive
//! front end drives, and the pan and zoom transforms behind it.

use crate::planes::Viewport;

/// Everything a single key press can ask for.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Move the view one sample towards positive imaginary.
    PanUp,
    /// Move the view one sample towards negative imaginary.
    PanDown,
    /// Move the view one sample towards negative real.
    PanLeft,
    /// Move the view one sample towards positive real.
    PanRight,
    /// Halve the scale about the center.
    ZoomIn,
    /// Double the scale about the center.
    ZoomOut,
    /// Write the current view to an image file.
    Export,
    /// Leave.
    Quit,
}

impl Command {
    /// The key table: `w`/`a`/`s`/`d` pan, `e` and `q` zoom in and out,
    /// a backtick or tilde exports.  Any other key quits.
    pub fn from_key(key: char) -> Command {
        match key {
            'w' => Command::PanUp,
            's' => Command::PanDown,
            'a' => Command::PanLeft,
            'd' => Command::PanRight,
            'e' => Command::ZoomIn,
            'q' => Command::ZoomOut,
            '`' | '~' => Command::Export,
            _ => Command::Quit,
        }
    }

    /// The command that undoes this one, for the transforms that have
    /// one.
    pub fn inverse(self) -> Option<Command> {
        match self {
            Command::PanUp => Some(Command::PanDown),
            Command::PanDown => Some(Command::PanUp),
            Command::PanLeft => Some(Command::PanRight),
            Command::PanRight => Some(Command::PanLeft),
            Command::ZoomIn => Some(Command::ZoomOut),
            Command::ZoomOut => Some(Command::ZoomIn),
            Command::Export | Command::Quit => None,
        }
    }
}

impl Viewport {
    /// Shift the box by whole samples along both axes.  Positive
    /// `columns` moves right, positive `rows` moves up.
    pub fn pan(&self, columns: i32, rows: i32) -> Viewport {
        let dre = f64::from(columns) * self.scale;
        let dim = f64::from(rows) * self.scale;
        Viewport {
            min_re: self.min_re + dre,
            max_re: self.max_re + dre,
            min_im: self.min_im + dim,
            max_im: self.max_im + dim,
            scale: self.scale,
        }
    }

    /// Multiply the scale and both extents by `factor`, keeping the
    /// center of the box where it is.  The pixel-space width and
    /// height are unchanged.
    pub fn zoom(&self, factor: f64) -> Viewport {
        let half_re = (self.max_re - self.min_re) * factor / 2.0;
        let half_im = (self.max_im - self.min_im) * factor / 2.0;
        let center = self.center();
        Viewport {
            min_re: center.re - half_re,
            max_re: center.re + half_re,
            min_im: center.im - half_im,
            max_im: center.im + half_im,
            scale: self.scale * factor,
        }
    }

    /// Apply one navigation command.  `Export` and `Quit` leave the
    /// viewport as it is.
    pub fn apply(&self, command: Command) -> Viewport {
        match command {
            Command::PanUp => self.pan(0, 1),
            Command::PanDown => self.pan(0, -1),
            Command::PanLeft => self.pan(-1, 0),
            Command::PanRight => self.pan(1, 0),
            Command::ZoomIn => self.zoom(0.5),
            Command::ZoomOut => self.zoom(2.0),
            Command::Export | Command::Quit => *self,
        }
    }
}
