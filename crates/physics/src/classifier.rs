//! Collision classification state machine.
//!
//! Two states: idle and tracking a stick drag on the ice. Ground contact
//! events and ticks move between them; collision events are classified
//! against whatever drag data exists at that moment.

use glam::Vec3;
use rinkaudio_core::{CollisionEvent, CueSink, HostEvent, SoundCategory, SoundCue, SurfaceLayer};
use tracing::debug;

use crate::drag::DragTrackingState;
use crate::tuning::ClassifierTuning;

/// Whether a stick drag is being tracked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassifierPhase {
    /// No stick on the ice.
    Idle,
    /// Stick on the ice, accumulating drag each tick.
    TrackingDrag,
}

/// Turns stick and puck physics signals into sound cues.
#[derive(Debug, Clone, Default)]
pub struct CollisionClassifier {
    tuning: ClassifierTuning,
    drag: DragTrackingState,
    clock: f32,
}

impl CollisionClassifier {
    /// Create an idle classifier.
    pub fn new(tuning: ClassifierTuning) -> Self {
        Self {
            tuning,
            drag: DragTrackingState::default(),
            clock: 0.0,
        }
    }

    /// Active thresholds.
    pub fn tuning(&self) -> &ClassifierTuning {
        &self.tuning
    }

    /// Current drag state.
    pub fn drag(&self) -> &DragTrackingState {
        &self.drag
    }

    /// Latest known simulation time.
    pub fn clock(&self) -> f32 {
        self.clock
    }

    /// Current phase.
    pub fn phase(&self) -> ClassifierPhase {
        if self.drag.active {
            ClassifierPhase::TrackingDrag
        } else {
            ClassifierPhase::Idle
        }
    }

    /// Stick touched a surface. Only ice starts tracking, and an ongoing drag
    /// is not restarted.
    pub fn on_stick_grounded(&mut self, now: f32, surface: &str, position: Vec3) {
        self.clock = now;
        if self.drag.active {
            return;
        }
        if SurfaceLayer::from_name(surface) == SurfaceLayer::Ice {
            self.drag.begin(now, position);
            debug!(now, "stick contacted ice, tracking drag");
        }
    }

    /// Stick left the ground.
    pub fn on_stick_ungrounded(&mut self, now: f32) {
        self.clock = now;
        self.drag.end(now);
    }

    /// Fixed-timestep update with the current stick transform.
    pub fn on_tick(&mut self, dt: f32, stick_position: Vec3, grounded: bool) {
        self.clock += dt;
        if !self.drag.active {
            return;
        }
        if !grounded {
            self.drag.end(self.clock);
            return;
        }
        self.drag.advance(dt, stick_position);
    }

    /// Cues for a stick hitting the puck, independent of phase.
    pub fn classify_stick_hit(&self, now: f32, force: f32, position: Vec3) -> SoundCue {
        let t = &self.tuning;
        let slapshot = match self.drag.elapsed(now) {
            Some(elapsed) => {
                // Drag time and time since contact share the same clock.
                let drag_ok = elapsed >= t.min_drag_time;
                let distance_ok = self.drag.accumulated_distance >= t.min_drag_distance;
                let timing_ok = elapsed <= t.max_time_since_contact;
                let force_ok = force >= t.min_shot_force;
                debug!(
                    elapsed,
                    force,
                    distance = self.drag.accumulated_distance,
                    drag_ok,
                    distance_ok,
                    timing_ok,
                    force_ok,
                    "slapshot check"
                );
                drag_ok && distance_ok && timing_ok && force_ok
            }
            None => false,
        };

        if slapshot {
            SoundCue {
                category: SoundCategory::PuckShot,
                position,
                volume: t.slapshot_volume(force, self.drag.max_speed),
            }
        } else {
            SoundCue {
                category: SoundCategory::PuckStickHandling,
                position,
                volume: t.stick_handling.volume(force),
            }
        }
    }

    /// Cue for the puck hitting the rink, if the layer and force call for one.
    pub fn classify_surface_hit(
        &self,
        layer: SurfaceLayer,
        force: f32,
        puck_height: f32,
        position: Vec3,
    ) -> Option<SoundCue> {
        let t = &self.tuning;
        let (category, volume) = match layer {
            SurfaceLayer::Ice => {
                if force < t.ice_min_force {
                    debug!(force, "ice collision too light");
                    return None;
                }
                (SoundCategory::PuckHitIce, t.ice.volume(force))
            }
            SurfaceLayer::Boards => {
                if force < t.boards_min_force {
                    debug!(force, "boards collision too light");
                    return None;
                }
                let is_glass = puck_height > t.glass_height;
                let (rule, slow, normal) = if is_glass {
                    (
                        &t.glass,
                        SoundCategory::PuckHitGlassSlow,
                        SoundCategory::PuckHitGlass,
                    )
                } else {
                    (
                        &t.boards,
                        SoundCategory::PuckHitBoardsSlow,
                        SoundCategory::PuckHitBoards,
                    )
                };
                let category = if force < rule.slow_below { slow } else { normal };
                debug!(puck_height, force, is_glass, "boards collision");
                (category, rule.volume.volume(force))
            }
            // Goal posts keep the host's own sound.
            SurfaceLayer::GoalPost | SurfaceLayer::Stick | SurfaceLayer::Other => return None,
        };
        Some(SoundCue {
            category,
            position,
            volume,
        })
    }

    /// Every cue a puck collision produces, without touching state.
    pub fn classify(&self, event: &CollisionEvent) -> Vec<SoundCue> {
        let force = event.force();
        let mut cues = Vec::new();
        if event.is_stick() {
            cues.push(self.classify_stick_hit(event.time, force, event.self_position));
        }
        if let Some(cue) =
            self.classify_surface_hit(event.layer(), force, event.self_height(), event.self_position)
        {
            cues.push(cue);
        }
        cues
    }

    /// Classify a puck collision and dispatch the cues to `sink`.
    ///
    /// Returns the cues that were actually played. A played slapshot consumes
    /// the drag wind-up. The physical collision itself is never affected.
    pub fn on_puck_collision(
        &mut self,
        event: &CollisionEvent,
        sink: &mut dyn CueSink,
    ) -> Vec<SoundCue> {
        self.clock = event.time;
        debug!(
            label = %event.other_label,
            layer = %event.other_layer,
            force = event.force(),
            puck_height = event.self_height(),
            other_height = event.other_height(),
            "puck collision"
        );
        let mut played = Vec::new();
        for cue in self.classify(event) {
            if !sink.play_cue(&cue) {
                continue;
            }
            debug!(category = cue.category.name(), volume = cue.volume, "played cue");
            if cue.category == SoundCategory::PuckShot {
                self.drag.consume();
            }
            played.push(cue);
        }
        played
    }

    /// Route any host event; returns the cues it played.
    pub fn handle(&mut self, event: &HostEvent, sink: &mut dyn CueSink) -> Vec<SoundCue> {
        match event {
            HostEvent::Tick {
                dt,
                stick_position,
                grounded,
            } => {
                self.on_tick(*dt, *stick_position, *grounded);
                Vec::new()
            }
            HostEvent::StickGrounded {
                time,
                surface,
                position,
            } => {
                self.on_stick_grounded(*time, surface, *position);
                Vec::new()
            }
            HostEvent::StickUngrounded { time } => {
                self.on_stick_ungrounded(*time);
                Vec::new()
            }
            HostEvent::Collision(collision) => self.on_puck_collision(collision, sink),
            // Listener moves and direct plays are routed by the owner of the manager.
            HostEvent::Listener { .. } | HostEvent::PlaySound { .. } => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stick_hit(time: f32, force: f32) -> CollisionEvent {
        CollisionEvent {
            time,
            other_label: "Stick".into(),
            other_layer: "Stick".into(),
            relative_velocity: Vec3::new(force, 0.0, 0.0),
            other_position: Vec3::ZERO,
            self_position: Vec3::new(0.0, 0.05, 0.0),
        }
    }

    fn rink_hit(layer: &str, force: f32, puck_y: f32) -> CollisionEvent {
        CollisionEvent {
            time: 5.0,
            other_label: layer.into(),
            other_layer: layer.into(),
            relative_velocity: Vec3::new(0.0, 0.0, force),
            other_position: Vec3::ZERO,
            self_position: Vec3::new(3.0, puck_y, 1.0),
        }
    }

    /// Classifier that touched ice at t=0 and dragged 2 units at a peak of 5 u/s.
    fn wound_up() -> CollisionClassifier {
        let mut classifier = CollisionClassifier::default();
        classifier.on_stick_grounded(0.0, "Ice", Vec3::ZERO);
        for i in 1..=10 {
            classifier.on_tick(0.04, Vec3::new(i as f32 * 0.2, 0.0, 0.0), true);
        }
        classifier
    }

    #[test]
    fn ice_contact_starts_tracking() {
        let mut classifier = CollisionClassifier::default();
        assert_eq!(classifier.phase(), ClassifierPhase::Idle);
        classifier.on_stick_grounded(0.0, "Boards", Vec3::ZERO);
        assert_eq!(classifier.phase(), ClassifierPhase::Idle);
        classifier.on_stick_grounded(0.0, "Ice", Vec3::ZERO);
        assert_eq!(classifier.phase(), ClassifierPhase::TrackingDrag);
    }

    #[test]
    fn repeated_grounding_does_not_restart_drag() {
        let mut classifier = wound_up();
        classifier.on_stick_grounded(0.3, "Ice", Vec3::new(9.0, 0.0, 0.0));
        assert_eq!(classifier.drag().contact_time, Some(0.0));
        assert!((classifier.drag().accumulated_distance - 2.0).abs() < 1e-4);
    }

    #[test]
    fn ticks_accumulate_drag() {
        let classifier = wound_up();
        assert!((classifier.drag().accumulated_distance - 2.0).abs() < 1e-4);
        assert!((classifier.drag().max_speed - 5.0).abs() < 1e-3);
    }

    #[test]
    fn ungrounded_tick_ends_tracking() {
        let mut classifier = wound_up();
        classifier.on_tick(0.04, Vec3::new(3.0, 0.5, 0.0), false);
        assert_eq!(classifier.phase(), ClassifierPhase::Idle);
        // Ticks while idle change nothing.
        classifier.on_tick(0.04, Vec3::new(9.0, 0.0, 0.0), true);
        assert!((classifier.drag().accumulated_distance - 2.0).abs() < 1e-4);
    }

    #[test]
    fn wound_up_hard_hit_is_slapshot() {
        let mut classifier = wound_up();
        let mut sink = Vec::new();
        let played = classifier.on_puck_collision(&stick_hit(0.5, 10.0), &mut sink);

        assert_eq!(played.len(), 1);
        assert_eq!(played[0].category, SoundCategory::PuckShot);
        assert!((played[0].volume - 0.4).abs() < 1e-3);
        assert_eq!(classifier.phase(), ClassifierPhase::Idle);
        assert_eq!(classifier.drag().accumulated_distance, 0.0);
        assert_eq!(classifier.drag().max_speed, 0.0);
    }

    #[test]
    fn slapshot_gates() {
        let classifier = wound_up();
        let at = Vec3::ZERO;
        // Too soon after contact.
        assert_eq!(
            classifier.classify_stick_hit(0.05, 20.0, at).category,
            SoundCategory::PuckStickHandling
        );
        // Too long after contact.
        assert_eq!(
            classifier.classify_stick_hit(1.2, 20.0, at).category,
            SoundCategory::PuckStickHandling
        );
        // Too soft.
        assert_eq!(
            classifier.classify_stick_hit(0.5, 7.9, at).category,
            SoundCategory::PuckStickHandling
        );
        // Boundaries are inclusive.
        assert_eq!(
            classifier.classify_stick_hit(1.0, 8.0, at).category,
            SoundCategory::PuckShot
        );
    }

    #[test]
    fn drag_distance_gate_applies_when_configured() {
        let mut classifier = CollisionClassifier::new(ClassifierTuning {
            min_drag_distance: 3.0,
            ..Default::default()
        });
        classifier.on_stick_grounded(0.0, "Ice", Vec3::ZERO);
        classifier.on_tick(0.1, Vec3::new(2.0, 0.0, 0.0), true);
        assert_eq!(
            classifier.classify_stick_hit(0.5, 20.0, Vec3::ZERO).category,
            SoundCategory::PuckStickHandling
        );
    }

    #[test]
    fn stick_hit_without_ice_contact_is_stick_handling() {
        let classifier = CollisionClassifier::default();
        let cue = classifier.classify_stick_hit(0.5, 50.0, Vec3::ZERO);
        assert_eq!(cue.category, SoundCategory::PuckStickHandling);
        assert_eq!(cue.volume, 1.0);
        assert_eq!(classifier.classify_stick_hit(0.5, 1.0, Vec3::ZERO).volume, 0.2);
    }

    #[test]
    fn leaving_ice_then_late_hit_is_stick_handling() {
        let mut classifier = wound_up();
        classifier.on_stick_ungrounded(0.45);
        assert_eq!(classifier.phase(), ClassifierPhase::Idle);

        let mut sink = Vec::new();
        let played = classifier.on_puck_collision(&stick_hit(1.6, 25.0), &mut sink);
        assert_eq!(played[0].category, SoundCategory::PuckStickHandling);
        assert!((played[0].volume - 1.0).abs() < 1e-6);
    }

    #[test]
    fn unplayed_slapshot_keeps_wind_up() {
        struct Silent;
        impl CueSink for Silent {
            fn play_cue(&mut self, _cue: &SoundCue) -> bool {
                false
            }
        }

        let mut classifier = wound_up();
        let played = classifier.on_puck_collision(&stick_hit(0.5, 10.0), &mut Silent);
        assert!(played.is_empty());
        assert_eq!(classifier.phase(), ClassifierPhase::TrackingDrag);
        assert!(classifier.drag().accumulated_distance > 0.0);
    }

    #[test]
    fn ice_hits_need_minimum_force() {
        let classifier = CollisionClassifier::default();
        assert!(classifier.classify(&rink_hit("Ice", 1.0, 0.05)).is_empty());

        let cues = classifier.classify(&rink_hit("Ice", 5.0, 0.05));
        assert_eq!(cues.len(), 1);
        assert_eq!(cues[0].category, SoundCategory::PuckHitIce);
        assert!((cues[0].volume - 0.2).abs() < 1e-6);
        assert_eq!(cues[0].position, Vec3::new(3.0, 0.05, 1.0));

        let soft = classifier.classify(&rink_hit("Ice", 2.0, 0.05));
        assert!((soft[0].volume - 0.1).abs() < 1e-6);
    }

    #[test]
    fn boards_route_by_height_and_force() {
        let classifier = CollisionClassifier::default();
        let category =
            |force: f32, y: f32| classifier.classify(&rink_hit("Boards", force, y))[0].category;

        assert_eq!(category(12.0, 0.5), SoundCategory::PuckHitBoards);
        assert_eq!(category(9.9, 0.5), SoundCategory::PuckHitBoardsSlow);
        assert_eq!(category(9.0, 2.5), SoundCategory::PuckHitGlass);
        assert_eq!(category(7.9, 2.5), SoundCategory::PuckHitGlassSlow);
        // Exactly at the threshold is still boards.
        assert_eq!(category(12.0, 2.0), SoundCategory::PuckHitBoards);

        assert!(classifier.classify(&rink_hit("Boards", 0.5, 0.5)).is_empty());
    }

    #[test]
    fn boards_and_glass_volumes() {
        let classifier = CollisionClassifier::default();
        let boards = classifier.classify(&rink_hit("Boards", 1.0, 0.5));
        assert!((boards[0].volume - 0.15).abs() < 1e-6);
        let boards = classifier.classify(&rink_hit("Boards", 10.0, 0.5));
        assert!((boards[0].volume - 0.5).abs() < 1e-6);

        let glass = classifier.classify(&rink_hit("Boards", 1.0, 3.0));
        assert!((glass[0].volume - 0.1).abs() < 1e-6);
        let glass = classifier.classify(&rink_hit("Boards", 30.0, 3.0));
        assert_eq!(glass[0].volume, 1.0);
    }

    #[test]
    fn host_events_drive_the_same_paths() {
        let mut classifier = CollisionClassifier::default();
        let mut sink = Vec::new();
        let events = [
            HostEvent::StickGrounded {
                time: 0.0,
                surface: "Ice".into(),
                position: Vec3::ZERO,
            },
            HostEvent::Tick {
                dt: 0.25,
                stick_position: Vec3::new(1.0, 0.0, 0.0),
                grounded: true,
            },
            HostEvent::Collision(stick_hit(0.3, 12.0)),
        ];
        for event in &events {
            classifier.handle(event, &mut sink);
        }
        assert_eq!(sink.len(), 1);
        assert_eq!(sink[0].category, SoundCategory::PuckShot);
        assert_eq!(classifier.clock(), 0.3);
    }

    #[test]
    fn goal_posts_and_unknown_layers_are_silent() {
        let classifier = CollisionClassifier::default();
        assert!(classifier.classify(&rink_hit("Goal Post", 20.0, 0.5)).is_empty());
        assert!(classifier.classify(&rink_hit("Player", 20.0, 0.5)).is_empty());
    }

    #[test]
    fn listener_and_direct_play_leave_classifier_untouched() {
        let mut classifier = wound_up();
        let mut sink = Vec::new();
        let listener = HostEvent::Listener {
            position: Vec3::new(0.0, 2.0, 0.0),
        };
        let direct = HostEvent::PlaySound {
            category: SoundCategory::PuckShot,
            position: Vec3::ZERO,
            volume: 1.0,
        };
        assert!(classifier.handle(&listener, &mut sink).is_empty());
        assert!(classifier.handle(&direct, &mut sink).is_empty());
        assert!(sink.is_empty());
        assert_eq!(classifier.phase(), ClassifierPhase::TrackingDrag);
        assert!(classifier.drag().active);
    }
}
