//! Local video mirroring flags. Never synchronized.

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum VideoFeed {
    Own,
    Opponent,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MirrorAxis {
    Horizontal,
    Vertical,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MirrorFlags {
    pub horizontal: bool,
    pub vertical: bool,
}

impl MirrorFlags {
    pub fn toggle(&mut self, axis: MirrorAxis) {
        match axis {
            MirrorAxis::Horizontal => self.horizontal = !self.horizontal,
            MirrorAxis::Vertical => self.vertical = !self.vertical,
        }
    }

    /// CSS transform applying both flags at once.
    pub fn css_transform(&self) -> String {
        let scale_x = if self.horizontal { -1 } else { 1 };
        let scale_y = if self.vertical { -1 } else { 1 };
        format!("scaleX({}) scaleY({})", scale_x, scale_y)
    }
}

#[derive(Clone, Debug, Default)]
pub struct VideoMirrors {
    own: MirrorFlags,
    opponent: MirrorFlags,
}

impl VideoMirrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn flags(&self, feed: VideoFeed) -> MirrorFlags {
        match feed {
            VideoFeed::Own => self.own,
            VideoFeed::Opponent => self.opponent,
        }
    }

    pub fn toggle(&mut self, feed: VideoFeed, axis: MirrorAxis) -> MirrorFlags {
        let flags = match feed {
            VideoFeed::Own => &mut self.own,
            VideoFeed::Opponent => &mut self.opponent,
        };
        flags.toggle(axis);
        *flags
    }
}
