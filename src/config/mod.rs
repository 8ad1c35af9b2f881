//! Simulation configuration. Not part of spec.md; added per the teacher's
//! `serde`-gated configuration idiom (see `SPEC_FULL.md` §8).

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationConfig {
    pub capacity: i64,
    pub span: Option<i64>,
    pub warm_up: Option<i64>,
    pub resume_overhead: i64,
}

impl SimulationConfig {
    pub fn new(capacity: i64) -> Self {
        Self {
            capacity,
            span: None,
            warm_up: None,
            resume_overhead: 0,
        }
    }

    pub fn with_span(mut self, span: i64) -> Self {
        self.span = Some(span);
        self
    }

    pub fn with_warm_up(mut self, warm_up: i64) -> Self {
        self.warm_up = Some(warm_up);
        self
    }

    pub fn with_resume_overhead(mut self, overhead: i64) -> Self {
        self.resume_overhead = overhead;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_have_no_span_or_warm_up() {
        let config = SimulationConfig::new(10);
        assert_eq!(config.span, None);
        assert_eq!(config.warm_up, None);
        assert_eq!(config.resume_overhead, 0);
    }

    #[test]
    fn builder_methods_set_fields() {
        let config = SimulationConfig::new(10).with_span(1000).with_warm_up(50).with_resume_overhead(5);
        assert_eq!(config.span, Some(1000));
        assert_eq!(config.warm_up, Some(50));
        assert_eq!(config.resume_overhead, 5);
    }
}
