use crate::bt::{Binding, BtContext, BtNode, BtStatus, Children};
use crate::param::{ParamError, ParamValue};
use canopy_core::Blackboard;

/// Entry point of every tree; forwards to its single child.
#[derive(Debug, Clone, Copy, Default)]
pub struct Root;

impl Root {
    pub const NAME: &'static str = "Root";
}

impl BtNode for Root {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn tick(&mut self, children: &mut Children<'_, '_>, ctx: &mut BtContext<'_>) -> BtStatus {
        if children.is_empty() {
            return BtStatus::Error;
        }
        children.evaluate(0, ctx)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Inverse;

impl Inverse {
    pub const NAME: &'static str = "Inverse";
}

impl BtNode for Inverse {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn tick(&mut self, children: &mut Children<'_, '_>, ctx: &mut BtContext<'_>) -> BtStatus {
        if children.is_empty() {
            return BtStatus::Error;
        }
        children.evaluate(0, ctx).invert()
    }
}

/// Evaluates its child `times` times within a single tick and reports the last status.
///
/// This blocks the whole traversal for all repetitions; it does not spread them over ticks.
#[derive(Debug, Clone, Copy, Default)]
pub struct RepeatTimes {
    pub times: u32,
}

impl RepeatTimes {
    pub const NAME: &'static str = "RepeatTimes";

    pub fn new(times: u32) -> Self {
        Self { times }
    }
}

impl BtNode for RepeatTimes {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn set_param(&mut self, param: &str, value: &ParamValue) -> Result<(), ParamError> {
        match param {
            "times" => {
                self.times = value.as_count(param)?;
                Ok(())
            }
            _ => Err(ParamError::unknown(Self::NAME, param)),
        }
    }

    fn tick(&mut self, children: &mut Children<'_, '_>, ctx: &mut BtContext<'_>) -> BtStatus {
        if children.is_empty() {
            return BtStatus::Error;
        }
        let mut status = BtStatus::Success;
        for _ in 0..self.times {
            status = children.evaluate(0, ctx);
            if status == BtStatus::Error {
                break;
            }
        }
        status
    }
}

/// Keeps its child looping: reports `Running` until the child fails or errors.
///
/// A succeeding child is re-run on the next tick rather than completing this node.
#[derive(Debug, Clone, Copy, Default)]
pub struct RunTillFail;

impl RunTillFail {
    pub const NAME: &'static str = "RunTillFail";
}

impl BtNode for RunTillFail {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn tick(&mut self, children: &mut Children<'_, '_>, ctx: &mut BtContext<'_>) -> BtStatus {
        if children.is_empty() {
            return BtStatus::Error;
        }
        match children.evaluate(0, ctx) {
            status @ (BtStatus::Failure | BtStatus::Error) => status,
            _ => BtStatus::Running,
        }
    }
}

/// Gates its child behind a cooldown measured in tree time.
///
/// The cooldown runs from the moment the node last closed and keeps running while the node is
/// not visited. With `fire_first` the gate starts open.
#[derive(Debug, Clone, Copy, Default)]
pub struct WaitForSeconds {
    pub seconds: f64,
    pub fire_first: bool,
    closed_at: f64,
}

impl WaitForSeconds {
    pub const NAME: &'static str = "WaitForSeconds";

    pub fn new(seconds: f64) -> Self {
        Self {
            seconds,
            ..Self::default()
        }
    }

    pub fn with_fire_first(mut self, fire_first: bool) -> Self {
        self.fire_first = fire_first;
        self
    }

    /// Seconds of tree time since the timer last restarted.
    pub fn elapsed(&self, now: f64) -> f64 {
        now - self.closed_at
    }
}

impl BtNode for WaitForSeconds {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn set_param(&mut self, param: &str, value: &ParamValue) -> Result<(), ParamError> {
        match param {
            "seconds" => {
                let seconds = value.as_float(param)?;
                if !seconds.is_finite() || seconds < 0.0 {
                    return Err(ParamError::invalid(param, "must be a non-negative number"));
                }
                self.seconds = seconds;
            }
            "fire_first" => self.fire_first = value.as_bool(param)?,
            _ => return Err(ParamError::unknown(Self::NAME, param)),
        }
        Ok(())
    }

    fn init(&mut self, _binding: &Binding, _blackboard: &mut Blackboard) {
        self.closed_at = if self.fire_first { -self.seconds } else { 0.0 };
    }

    fn tick(&mut self, children: &mut Children<'_, '_>, ctx: &mut BtContext<'_>) -> BtStatus {
        if children.is_empty() {
            return BtStatus::Error;
        }
        if self.elapsed(ctx.now()) < self.seconds {
            return BtStatus::Running;
        }
        children.evaluate(0, ctx)
    }

    fn on_end(&mut self, ctx: &mut BtContext<'_>) {
        self.closed_at = ctx.now();
    }
}
