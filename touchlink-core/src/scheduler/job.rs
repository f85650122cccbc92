//! Multi-step background jobs
//!
//! A job issues one command block per step. Steps are paced by wall-clock
//! time and by the host's motion queue; nothing here ever sleeps.

use crate::gcode::{self, Gcode};
use crate::settings::{FilamentPreferences, LevelingPreferences};
use crate::traits::{Heater, PrinterHost};

/// Which job is running
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum JobKind {
    Leveling,
    Load,
    Unload,
}

/// Result of one step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StepOutcome {
    /// A command block was issued, more to follow
    Issued,
    /// Precondition not met yet; nothing issued
    Waiting,
    /// Final block issued, job done
    Finished,
}

/// Number of points visited by the leveling walk
pub const LEVELING_POINTS: usize = 5;

/// Corner-and-centre walk used for manual bed leveling
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LevelingWalk {
    points: [(u16, u16); LEVELING_POINTS],
    next: usize,
    travel_mm: u8,
}

impl LevelingWalk {
    pub fn new(bed_x_mm: u16, bed_y_mm: u16, prefs: &LevelingPreferences) -> Self {
        let inset = u16::from(prefs.inset_mm).min(bed_x_mm / 2).min(bed_y_mm / 2);
        let (x0, x1) = (inset, bed_x_mm - inset);
        let (y0, y1) = (inset, bed_y_mm - inset);
        Self {
            points: [
                (x0, y0),
                (x1, y0),
                (x1, y1),
                (x0, y1),
                (bed_x_mm / 2, bed_y_mm / 2),
            ],
            next: 0,
            travel_mm: prefs.travel_height_mm,
        }
    }

    pub fn points(&self) -> &[(u16, u16)] {
        &self.points
    }

    fn step(&mut self, out: &mut Gcode) -> StepOutcome {
        match self.points.get(self.next) {
            Some(&(x, y)) => {
                *out = gcode::probe_point(x, y, self.travel_mm);
                self.next += 1;
                StepOutcome::Issued
            }
            None => {
                *out = gcode::lift(self.travel_mm);
                StepOutcome::Finished
            }
        }
    }

    fn progress(&self) -> u8 {
        (self.next * 100 / LEVELING_POINTS) as u8
    }
}

/// Filament load or unload in fixed extruder steps
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FilamentMove {
    unload: bool,
    total_mm: u16,
    moved_mm: u16,
    step_mm: u16,
    feed_rate: u16,
    min_temp_c: u16,
}

impl FilamentMove {
    pub fn load(prefs: &FilamentPreferences, step_mm: u16) -> Self {
        Self::new(false, prefs.load_mm, prefs, step_mm)
    }

    pub fn unload(prefs: &FilamentPreferences, step_mm: u16) -> Self {
        Self::new(true, prefs.unload_mm, prefs, step_mm)
    }

    fn new(unload: bool, total_mm: u16, prefs: &FilamentPreferences, step_mm: u16) -> Self {
        Self {
            unload,
            total_mm,
            moved_mm: 0,
            step_mm: step_mm.max(1),
            feed_rate: prefs.feed_rate,
            min_temp_c: prefs.min_temp_c,
        }
    }

    fn step<H: PrinterHost + ?Sized>(&mut self, host: &H, out: &mut Gcode) -> StepOutcome {
        if host.current_temperature(Heater::Hotend) < self.min_temp_c as i16 {
            return StepOutcome::Waiting;
        }
        let chunk = self.step_mm.min(self.total_mm - self.moved_mm);
        let mm = if self.unload {
            -(chunk as i16)
        } else {
            chunk as i16
        };
        *out = gcode::extrude(mm, self.feed_rate);
        self.moved_mm += chunk;
        if self.moved_mm >= self.total_mm {
            StepOutcome::Finished
        } else {
            StepOutcome::Issued
        }
    }

    fn progress(&self) -> u8 {
        if self.total_mm == 0 {
            return 100;
        }
        (u32::from(self.moved_mm) * 100 / u32::from(self.total_mm)) as u8
    }
}

/// A background job
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Job {
    Leveling(LevelingWalk),
    Filament(FilamentMove),
}

impl Job {
    pub fn kind(&self) -> JobKind {
        match self {
            Job::Leveling(_) => JobKind::Leveling,
            Job::Filament(f) if f.unload => JobKind::Unload,
            Job::Filament(_) => JobKind::Load,
        }
    }

    /// Completion in percent
    pub fn progress(&self) -> u8 {
        match self {
            Job::Leveling(walk) => walk.progress(),
            Job::Filament(f) => f.progress(),
        }
    }

    fn step<H: PrinterHost + ?Sized>(&mut self, host: &H, out: &mut Gcode) -> StepOutcome {
        match self {
            Job::Leveling(walk) => walk.step(out),
            Job::Filament(f) => f.step(host, out),
        }
    }
}

/// Runs at most one job at a time
#[derive(Debug, Clone)]
pub struct Scheduler {
    job: Option<Job>,
    /// The last job ran to completion and nothing has started since
    completed: bool,
    next_step_ms: u32,
    interval_ms: u32,
}

/// `now` has reached `deadline` on a wrapping clock
fn reached(now_ms: u32, deadline_ms: u32) -> bool {
    (now_ms.wrapping_sub(deadline_ms) as i32) >= 0
}

impl Scheduler {
    pub fn new(interval_ms: u32) -> Self {
        Self {
            job: None,
            completed: false,
            next_step_ms: 0,
            interval_ms,
        }
    }

    pub fn is_busy(&self) -> bool {
        self.job.is_some()
    }

    pub fn kind(&self) -> Option<JobKind> {
        self.job.as_ref().map(Job::kind)
    }

    pub fn job(&self) -> Option<&Job> {
        self.job.as_ref()
    }

    /// Progress of the running job
    ///
    /// Idle reports 100 after a completed job and 0 after an abort or
    /// before any job ran.
    pub fn progress(&self) -> u8 {
        match &self.job {
            Some(job) => job.progress(),
            None if self.completed => 100,
            None => 0,
        }
    }

    /// Start `job`; refused while another job is running
    ///
    /// The first step is due immediately.
    pub fn start(&mut self, job: Job, now_ms: u32) -> bool {
        if let Some(running) = &self.job {
            warn!("job {:?} busy, refusing {:?}", running.kind(), job.kind());
            return false;
        }
        info!("job {:?} started", job.kind());
        self.job = Some(job);
        self.completed = false;
        self.next_step_ms = now_ms;
        true
    }

    /// Advance the running job by at most one step
    ///
    /// Returns the job kind when this tick finished it.
    pub fn tick<H: PrinterHost + ?Sized>(&mut self, host: &mut H, now_ms: u32) -> Option<JobKind> {
        let job = self.job.as_mut()?;
        if !reached(now_ms, self.next_step_ms) || !host.is_motion_queue_empty() {
            return None;
        }

        let mut block = Gcode::new();
        let outcome = job.step(host, &mut block);
        if !block.is_empty() {
            host.inject_command(&block);
        }
        self.next_step_ms = now_ms.wrapping_add(self.interval_ms);

        match outcome {
            StepOutcome::Finished => {
                let kind = job.kind();
                info!("job {:?} finished", kind);
                self.job = None;
                self.completed = true;
                Some(kind)
            }
            StepOutcome::Issued | StepOutcome::Waiting => None,
        }
    }

    /// Cancel the running job and stop motion at once
    pub fn abort<H: PrinterHost + ?Sized>(&mut self, host: &mut H) -> Option<JobKind> {
        let kind = self.job.take()?.kind();
        self.completed = false;
        host.inject_command(gcode::QUICK_STOP);
        info!("job {:?} aborted", kind);
        Some(kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockHost;

    fn walk() -> Job {
        Job::Leveling(LevelingWalk::new(220, 200, &LevelingPreferences::default()))
    }

    #[test]
    fn test_walk_points() {
        let w = LevelingWalk::new(220, 200, &LevelingPreferences::default());
        assert_eq!(
            w.points(),
            &[(30, 30), (190, 30), (190, 170), (30, 170), (110, 100)]
        );
    }

    #[test]
    fn test_one_step_per_interval() {
        let mut host = MockHost::new();
        let mut s = Scheduler::new(500);
        assert!(s.start(walk(), 1000));

        assert_eq!(s.tick(&mut host, 1000), None);
        assert_eq!(host.commands.len(), 1);
        assert_eq!(s.tick(&mut host, 1200), None);
        assert_eq!(host.commands.len(), 1);
        s.tick(&mut host, 1500);
        assert_eq!(host.commands.len(), 2);
        assert_eq!(s.progress(), 40);
    }

    #[test]
    fn test_waits_for_motion_queue() {
        let mut host = MockHost::new();
        host.queued_moves = 1;
        let mut s = Scheduler::new(500);
        s.start(walk(), 0);
        s.tick(&mut host, 0);
        assert!(host.commands.is_empty());
        host.queued_moves = 0;
        s.tick(&mut host, 1);
        assert_eq!(host.commands.len(), 1);
    }

    #[test]
    fn test_walk_finishes() {
        let mut host = MockHost::new();
        let mut s = Scheduler::new(10);
        s.start(walk(), 0);
        let mut finished = None;
        for i in 0..LEVELING_POINTS as u32 + 1 {
            finished = s.tick(&mut host, i * 10);
        }
        assert_eq!(finished, Some(JobKind::Leveling));
        assert!(!s.is_busy());
        assert_eq!(host.commands.last().map(|c| c.as_str()), Some("G0 Z5"));
    }

    #[test]
    fn test_completed_progress_held_until_next_start() {
        let mut host = MockHost::new();
        let mut s = Scheduler::new(10);
        assert_eq!(s.progress(), 0);
        s.start(walk(), 0);
        for i in 0..LEVELING_POINTS as u32 + 1 {
            s.tick(&mut host, i * 10);
        }
        assert_eq!(s.progress(), 100);
        assert_eq!(s.tick(&mut host, 1000), None);
        assert_eq!(s.progress(), 100);

        s.start(walk(), 1000);
        assert_eq!(s.progress(), 0);
        s.abort(&mut host);
        assert_eq!(s.progress(), 0);
    }

    #[test]
    fn test_single_job() {
        let mut s = Scheduler::new(10);
        assert!(s.start(walk(), 0));
        let prefs = FilamentPreferences::default();
        assert!(!s.start(Job::Filament(FilamentMove::load(&prefs, 5)), 0));
        assert_eq!(s.kind(), Some(JobKind::Leveling));
    }

    #[test]
    fn test_filament_waits_for_heat() {
        let mut host = MockHost::new();
        host.hotend = 150;
        let prefs = FilamentPreferences {
            unload_mm: 12,
            ..Default::default()
        };
        let mut s = Scheduler::new(10);
        s.start(Job::Filament(FilamentMove::unload(&prefs, 5)), 0);
        assert_eq!(s.tick(&mut host, 0), None);
        assert!(host.commands.is_empty());

        host.hotend = 200;
        s.tick(&mut host, 10);
        s.tick(&mut host, 20);
        let done = s.tick(&mut host, 30);
        assert_eq!(done, Some(JobKind::Unload));
        assert_eq!(
            host.lines(),
            ["M83", "G1 E-5 F300", "M83", "G1 E-5 F300", "M83", "G1 E-2 F300"]
        );
    }

    #[test]
    fn test_abort_is_synchronous() {
        let mut host = MockHost::new();
        let mut s = Scheduler::new(10);
        s.start(walk(), 0);
        assert_eq!(s.abort(&mut host), Some(JobKind::Leveling));
        assert!(!s.is_busy());
        assert_eq!(host.commands.last().map(|c| c.as_str()), Some("M410"));
        assert_eq!(s.abort(&mut host), None);
    }

    #[test]
    fn test_wrapping_deadline() {
        assert!(reached(5, u32::MAX - 5));
        assert!(!reached(u32::MAX - 5, 5));
    }
}
