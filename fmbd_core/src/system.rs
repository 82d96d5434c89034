use nalgebra::DVector;

/// One configuration's flat coordinate vectors (spec §4.1 `CData`).
#[derive(Debug, Clone, Default)]
pub struct CData {
    pub ode2: DVector<f64>,
    pub ode2_t: DVector<f64>,
    pub ode2_tt: DVector<f64>,
    pub ode1: DVector<f64>,
    pub ae: DVector<f64>,
    pub data: DVector<f64>,
}

impl CData {
    pub fn zeros(n_ode2: usize, n_ode1: usize, n_ae: usize, n_data: usize) -> Self {
        Self {
            ode2: DVector::zeros(n_ode2),
            ode2_t: DVector::zeros(n_ode2),
            ode2_tt: DVector::zeros(n_ode2),
            ode1: DVector::zeros(n_ode1),
            ae: DVector::zeros(n_ae),
            data: DVector::zeros(n_data),
        }
    }
}

/// The five coexisting configurations (spec §3 "Configurations").
#[derive(Debug, Clone, Default)]
pub struct SystemData {
    pub reference: CData,
    pub initial: CData,
    pub current: CData,
    pub start_of_step: CData,
    pub visualization: CData,
}

impl SystemData {
    pub fn get(&self, config: crate::coords::ConfigurationType) -> &CData {
        use crate::coords::ConfigurationType::*;
        match config {
            Reference => &self.reference,
            Initial => &self.initial,
            Current => &self.current,
            StartOfStep => &self.start_of_step,
            Visualization => &self.visualization,
        }
    }

    pub fn get_mut(&mut self, config: crate::coords::ConfigurationType) -> &mut CData {
        use crate::coords::ConfigurationType::*;
        match config {
            Reference => &mut self.reference,
            Initial => &mut self.initial,
            Current => &mut self.current,
            StartOfStep => &mut self.start_of_step,
            Visualization => &mut self.visualization,
        }
    }

    /// `PostDiscontinuousIterationStep` finalization (spec §4.7): commit
    /// Current's Data coordinates as the new StartOfStep baseline.
    pub fn commit_discontinuous_step(&mut self) {
        self.start_of_step.data.copy_from(&self.current.data);
    }

    /// Commit a converged time step: Current becomes the new
    /// StartOfStep fallback (spec §3 "StartOfStep: fallback for solver").
    pub fn commit_step(&mut self) {
        self.start_of_step = self.current.clone();
    }

    /// Roll back to the last committed step (spec §5 "Cancellation":
    /// leave Current = StartOfStep).
    pub fn rollback_step(&mut self) {
        self.current = self.start_of_step.clone();
    }
}
