use crate::bt::{BtContext, BtNode, BtStatus, Children};
use crate::param::{ParamError, ParamValue};

/// Ticks children in order until one does not succeed.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sequence;

impl Sequence {
    pub const NAME: &'static str = "Sequence";
}

impl BtNode for Sequence {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn tick(&mut self, children: &mut Children<'_, '_>, ctx: &mut BtContext<'_>) -> BtStatus {
        if children.is_empty() {
            return BtStatus::Error;
        }
        for i in 0..children.len() {
            match children.evaluate(i, ctx) {
                BtStatus::Success => continue,
                other => return other,
            }
        }
        BtStatus::Success
    }
}

/// Ticks children in order until one does not fail.
#[derive(Debug, Clone, Copy, Default)]
pub struct Selector;

impl Selector {
    pub const NAME: &'static str = "Selector";
}

impl BtNode for Selector {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn tick(&mut self, children: &mut Children<'_, '_>, ctx: &mut BtContext<'_>) -> BtStatus {
        if children.is_empty() {
            return BtStatus::Error;
        }
        for i in 0..children.len() {
            match children.evaluate(i, ctx) {
                BtStatus::Failure => continue,
                other => return other,
            }
        }
        BtStatus::Failure
    }
}

/// Selector that resumes from the last child that succeeded or was running.
///
/// Earlier children are skipped on later ticks. The memory survives closing the node.
#[derive(Debug, Clone, Copy, Default)]
pub struct SelectorMemory {
    remembered: usize,
}

impl SelectorMemory {
    pub const NAME: &'static str = "SelectorMemory";

    pub fn remembered(&self) -> usize {
        self.remembered
    }
}

impl BtNode for SelectorMemory {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn tick(&mut self, children: &mut Children<'_, '_>, ctx: &mut BtContext<'_>) -> BtStatus {
        if children.is_empty() {
            return BtStatus::Error;
        }
        if self.remembered >= children.len() {
            self.remembered = 0;
        }
        for i in self.remembered..children.len() {
            match children.evaluate(i, ctx) {
                BtStatus::Failure => continue,
                BtStatus::Error => return BtStatus::Error,
                status => {
                    self.remembered = i;
                    return status;
                }
            }
        }
        BtStatus::Failure
    }
}

/// Sequence that advances at most one child per tick.
///
/// The cursor moves on child success and is only rewound when the node closes, so a failing
/// child stops progress without losing it mid-tick.
#[derive(Debug, Clone, Copy, Default)]
pub struct SequenceMemory {
    cursor: usize,
}

impl SequenceMemory {
    pub const NAME: &'static str = "SequenceMemory";

    pub fn cursor(&self) -> usize {
        self.cursor
    }
}

impl BtNode for SequenceMemory {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn tick(&mut self, children: &mut Children<'_, '_>, ctx: &mut BtContext<'_>) -> BtStatus {
        if children.is_empty() {
            return BtStatus::Error;
        }
        if self.cursor >= children.len() {
            return BtStatus::Success;
        }
        match children.evaluate(self.cursor, ctx) {
            BtStatus::Success => {
                self.cursor += 1;
                if self.cursor >= children.len() {
                    BtStatus::Success
                } else {
                    BtStatus::Running
                }
            }
            other => other,
        }
    }

    fn on_end(&mut self, _ctx: &mut BtContext<'_>) {
        self.cursor = 0;
    }
}

/// Ticks every child each tick and tolerates up to `max_failures` failing children.
#[derive(Debug, Clone, Copy, Default)]
pub struct Parallel {
    pub max_failures: u32,
}

impl Parallel {
    pub const NAME: &'static str = "Parallel";

    pub fn new(max_failures: u32) -> Self {
        Self { max_failures }
    }
}

impl BtNode for Parallel {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn set_param(&mut self, param: &str, value: &ParamValue) -> Result<(), ParamError> {
        match param {
            "max_failures" => {
                self.max_failures = value.as_count(param)?;
                Ok(())
            }
            _ => Err(ParamError::unknown(Self::NAME, param)),
        }
    }

    fn tick(&mut self, children: &mut Children<'_, '_>, ctx: &mut BtContext<'_>) -> BtStatus {
        if children.is_empty() {
            return BtStatus::Error;
        }
        let mut failures = 0u32;
        let mut running = false;
        for i in 0..children.len() {
            match children.evaluate(i, ctx) {
                BtStatus::Error => return BtStatus::Error,
                BtStatus::Failure => failures += 1,
                BtStatus::Running => running = true,
                BtStatus::Success => {}
            }
        }
        if failures > self.max_failures {
            BtStatus::Failure
        } else if running {
            BtStatus::Running
        } else {
            BtStatus::Success
        }
    }
}

/// Evaluates one uniformly chosen child per tick.
///
/// The choice comes from the tick's deterministic RNG, so replays with the same seed pick the
/// same children.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomSelector;

impl RandomSelector {
    pub const NAME: &'static str = "RandomSelector";
    const STREAM: u64 = 0x5E1E_C702;
}

impl BtNode for RandomSelector {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn tick(&mut self, children: &mut Children<'_, '_>, ctx: &mut BtContext<'_>) -> BtStatus {
        use canopy_core::DeterministicRng;

        if children.is_empty() {
            return BtStatus::Error;
        }
        let pick = ctx.rng(Self::STREAM).next_index(children.len());
        children.evaluate(pick, ctx)
    }
}
