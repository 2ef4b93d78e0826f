use crate::bt::{Binding, BtContext, BtNode, BtStatus, Children};
use crate::param::{ParamError, ParamValue};
use canopy_core::{Blackboard, DeterministicRng};

/// Leaf that maps a predicate to `Success` / `Failure`.
pub struct Condition<F> {
    cond: F,
}

impl<F> Condition<F>
where
    F: FnMut(&BtContext<'_>) -> bool + 'static,
{
    pub const NAME: &'static str = "Condition";

    pub fn new(cond: F) -> Self {
        Self { cond }
    }
}

impl<F> BtNode for Condition<F>
where
    F: FnMut(&BtContext<'_>) -> bool + 'static,
{
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn tick(&mut self, _children: &mut Children<'_, '_>, ctx: &mut BtContext<'_>) -> BtStatus {
        if (self.cond)(&*ctx) {
            BtStatus::Success
        } else {
            BtStatus::Failure
        }
    }
}

/// Leaf driven by a closure; return `Running` to be visited again next tick.
pub struct Action<F> {
    run: F,
}

impl<F> Action<F>
where
    F: FnMut(&mut BtContext<'_>) -> BtStatus + 'static,
{
    pub const NAME: &'static str = "Action";

    pub fn new(run: F) -> Self {
        Self { run }
    }
}

impl<F> BtNode for Action<F>
where
    F: FnMut(&mut BtContext<'_>) -> BtStatus + 'static,
{
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn tick(&mut self, _children: &mut Children<'_, '_>, ctx: &mut BtContext<'_>) -> BtStatus {
        (self.run)(ctx)
    }
}

/// Succeeds with probability `success_percentage` / 100.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomCondition {
    pub success_percentage: f64,
}

impl RandomCondition {
    pub const NAME: &'static str = "RandomCondition";
    const STREAM: u64 = 0xC0_1D_F1_1E;

    pub fn new(success_percentage: f64) -> Self {
        Self { success_percentage }
    }
}

impl BtNode for RandomCondition {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn set_param(&mut self, param: &str, value: &ParamValue) -> Result<(), ParamError> {
        match param {
            "success_percentage" => {
                let pct = value.as_float(param)?;
                if !(0.0..=100.0).contains(&pct) {
                    return Err(ParamError::invalid(param, "must be within 0..=100"));
                }
                self.success_percentage = pct;
                Ok(())
            }
            _ => Err(ParamError::unknown(Self::NAME, param)),
        }
    }

    fn tick(&mut self, _children: &mut Children<'_, '_>, ctx: &mut BtContext<'_>) -> BtStatus {
        let roll = f64::from(ctx.rng(Self::STREAM).next_f32_unit()) * 100.0;
        if roll < self.success_percentage {
            BtStatus::Success
        } else {
            BtStatus::Failure
        }
    }
}

/// Writes `line` to the log at info level. Errors when no line was configured.
#[derive(Debug, Clone, Default)]
pub struct Log {
    pub line: Option<String>,
}

impl Log {
    pub const NAME: &'static str = "Log";

    pub fn new(line: impl Into<String>) -> Self {
        Self {
            line: Some(line.into()),
        }
    }
}

impl BtNode for Log {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn set_param(&mut self, param: &str, value: &ParamValue) -> Result<(), ParamError> {
        match param {
            "line" => {
                self.line = Some(value.as_text(param)?.to_owned());
                Ok(())
            }
            _ => Err(ParamError::unknown(Self::NAME, param)),
        }
    }

    fn tick(&mut self, _children: &mut Children<'_, '_>, ctx: &mut BtContext<'_>) -> BtStatus {
        let Some(line) = self.line.as_deref() else {
            return BtStatus::Error;
        };
        tracing::info!(tree = ctx.tree().0, agent = ctx.agent(), "{line}");
        BtStatus::Success
    }
}

/// Reads a `bool` from the blackboard: `Success` when true, `Failure` when false.
///
/// A missing key or a value of another type is an error.
#[derive(Debug, Clone, Default)]
pub struct CheckBool {
    pub key: Option<String>,
}

impl CheckBool {
    pub const NAME: &'static str = "CheckBool";

    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: Some(key.into()),
        }
    }
}

impl BtNode for CheckBool {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn set_param(&mut self, param: &str, value: &ParamValue) -> Result<(), ParamError> {
        match param {
            "key" => {
                self.key = Some(value.as_text(param)?.to_owned());
                Ok(())
            }
            _ => Err(ParamError::unknown(Self::NAME, param)),
        }
    }

    fn init(&mut self, binding: &Binding, _blackboard: &mut Blackboard) {
        if self.key.is_none() {
            tracing::warn!(
                tree = binding.tree.0,
                node = binding.index,
                "CheckBool has no key and will always error"
            );
        }
    }

    fn tick(&mut self, _children: &mut Children<'_, '_>, ctx: &mut BtContext<'_>) -> BtStatus {
        let Some(key) = self.key.as_deref() else {
            return BtStatus::Error;
        };
        match ctx.blackboard.value::<bool>(key).copied() {
            Ok(true) => BtStatus::Success,
            Ok(false) => BtStatus::Failure,
            Err(err) => {
                tracing::error!(tree = ctx.tree().0, node = ctx.node(), %err, "CheckBool failed");
                BtStatus::Error
            }
        }
    }
}
