//! Frame planning: which (timestep, depth) combinations become images.

use crate::time::{day_indices, Timestep};

/// Identifies one output image (or one panel of it, when `member` is set).
#[derive(Debug, Clone, PartialEq)]
pub struct FrameDescriptor {
    /// Index into the dataset's time axis.
    pub time_index: usize,
    /// Calendar-day bucket of the timestep.
    pub day_index: usize,
    pub timestep: Timestep,
    /// Index into the depth axis, `None` for surface-only variables.
    pub depth_index: Option<usize>,
    /// Depth value in metres.
    pub depth: Option<f64>,
    /// Ensemble member shown by a panel.
    pub member: Option<usize>,
}

impl FrameDescriptor {
    pub fn date_string(&self) -> String {
        self.timestep.date_string()
    }

    pub fn hour_string(&self) -> String {
        self.timestep.hour_string()
    }

    pub fn minute_string(&self) -> String {
        self.timestep.minute_string()
    }

    /// Date stamp used in output filenames: `YYYY-MM-DD_HH30`.
    ///
    /// Products are half-hour centred, so the minute is always `30`.
    pub fn file_stamp(&self) -> String {
        format!("{}_{}30", self.date_string(), self.hour_string())
    }

    /// Human-readable timestamp for figure titles: `YYYY-MM-DD, HH:30`.
    pub fn title_timestamp(&self) -> String {
        format!("{}, {}:30", self.date_string(), self.hour_string())
    }

    /// Depth rounded toward zero to whole metres, as shown in titles.
    pub fn depth_label(&self) -> String {
        match self.depth {
            Some(d) => format!("{}", d.trunc() as i64),
            None => "surface".to_string(),
        }
    }

    /// The same frame, narrowed to one ensemble member.
    pub fn for_member(&self, member: usize) -> Self {
        Self {
            member: Some(member),
            ..self.clone()
        }
    }
}

/// Expand the time and depth axes into the frames for one requested day.
///
/// Timesteps in other day buckets are skipped. Within the selected day,
/// frames are ordered by time and then by depth.
pub fn plan_frames(
    timesteps: &[Timestep],
    depths: Option<&[f64]>,
    day_index: usize,
) -> Vec<FrameDescriptor> {
    let days = day_indices(timesteps);
    let mut frames = Vec::new();

    for (time_index, (timestep, day)) in timesteps.iter().zip(days).enumerate() {
        if day != day_index {
            continue;
        }

        match depths {
            Some(depths) => {
                for (depth_index, &depth) in depths.iter().enumerate() {
                    frames.push(FrameDescriptor {
                        time_index,
                        day_index: day,
                        timestep: *timestep,
                        depth_index: Some(depth_index),
                        depth: Some(depth),
                        member: None,
                    });
                }
            }
            None => frames.push(FrameDescriptor {
                time_index,
                day_index: day,
                timestep: *timestep,
                depth_index: None,
                depth: None,
                member: None,
            }),
        }
    }

    frames
}

/// Arrangement of ensemble members in a postage-stamp grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemberLayout {
    pub members: usize,
    pub columns: usize,
}

impl MemberLayout {
    pub fn new(members: usize, columns: usize) -> Self {
        Self {
            members,
            columns: columns.max(1),
        }
    }

    pub fn rows(&self) -> usize {
        self.members.div_ceil(self.columns)
    }

    /// Grid cell (row, col) of a member, filled row by row.
    pub fn position(&self, member: usize) -> (usize, usize) {
        (member / self.columns, member % self.columns)
    }
}
