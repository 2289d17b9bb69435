//! In-place rotation calculations

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// Internal imports
use super::*;
use crate::loc::Pose;
use sim_if::eqpt::wheels::WheelDems;
use util::maths;

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl BugCtrl {

    /// Perform the rotating state action: spin in place until aligned with
    /// the stored rotation target.
    ///
    /// The spin rate is proportional to the remaining angle, with no
    /// forward component. Once the error drops inside the alignment
    /// threshold the state switches to rounding and the rotation target is
    /// dropped.
    pub(crate) fn action_rotating(
        &mut self,
        pose: &Pose
    ) -> Result<WheelDems, BugCtrlError> {

        let target_dir = self.target_dir
            .ok_or(BugCtrlError::NoTargetDirection)?;

        let angle = maths::angle_between_signed(&pose.forward(), &target_dir)?;

        if angle.abs() > self.params.rotate_align_threshold_rad {
            Ok(WheelDems {
                left_rads: angle,
                right_rads: -angle,
            })
        }
        else {
            // Aligned parallel to the boundary, begin following it
            self.state = NavState::Rounding;
            self.target_dir = None;

            Ok(WheelDems::stop())
        }
    }
}
