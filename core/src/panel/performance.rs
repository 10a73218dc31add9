use crate::messages::{ConceptPerformanceState, PerformanceStateAttribute, TaskPerformanceState};
use crate::panel::ordering::{NodePrioritizer, ObservedAssessmentFirst, PrioritizedNode};
use crate::panel::sound::AssessmentSoundType;
use crate::prelude::{AssessmentLevel, DisplaySettings, PerformanceNodeState};
use crate::telemetry::LogManager;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewLayout {
    /// Leaf concepts only, intermediate concepts flattened away.
    List,
    /// Intermediate concepts keep their children beneath them.
    Tree,
}

/// Who is looking at the panel and how it should be drawn.
#[derive(Clone, Copy)]
pub struct RedrawContext<'a> {
    pub settings: &'a DisplaySettings,
    pub user_name: Option<&'a str>,
    pub playback_mode: bool,
    pub layout: ViewLayout,
    pub prioritizer: &'a dyn NodePrioritizer<ConceptItem>,
}

impl<'a> RedrawContext<'a> {
    pub fn new(settings: &'a DisplaySettings) -> Self {
        Self {
            settings,
            user_name: None,
            playback_mode: false,
            layout: ViewLayout::List,
            prioritizer: &ObservedAssessmentFirst,
        }
    }

    pub fn with_user(mut self, user_name: &'a str) -> Self {
        self.user_name = Some(user_name);
        self
    }

    pub fn in_playback(mut self, playback_mode: bool) -> Self {
        self.playback_mode = playback_mode;
        self
    }
}

/// Attention styling for one node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NodeHighlights {
    pub observed_assessment_needed: bool,
    pub below_expectation: bool,
}

impl NodeHighlights {
    pub fn evaluate(
        attribute: &PerformanceStateAttribute,
        observed_condition: bool,
        settings: &DisplaySettings,
    ) -> Self {
        Self {
            observed_assessment_needed: observed_condition
                && attribute.short_term == AssessmentLevel::Unknown
                && !settings.hide_oc_assessment_visual,
            below_expectation: !attribute.is_unactivated()
                && attribute.short_term.is_poor_performing()
                && !settings.hide_poor_assessment_visual,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum NodeKind {
    Task,
    Concept,
}

fn requested_sound(
    attribute: &PerformanceStateAttribute,
    observed_condition: bool,
    allow: bool,
    kind: NodeKind,
    ctx: &RedrawContext<'_>,
) -> AssessmentSoundType {
    let settings = ctx.settings;
    let own_evaluation = matches!(
        (attribute.evaluator.as_deref(), ctx.user_name),
        (Some(evaluator), Some(user)) if evaluator.eq_ignore_ascii_case(user)
    );
    let other_client_or_playback = !own_evaluation || ctx.playback_mode;
    let active = attribute.node_state == PerformanceNodeState::Active;
    let passes_support_filter = !attribute.scenario_support || settings.show_scenario_support;
    let passes_auto_filter = kind == NodeKind::Task
        || observed_condition
        || !(settings.hide_good_auto_assessments && !attribute.short_term.is_poor_performing());

    if !(allow && active && other_client_or_playback && passes_support_filter && passes_auto_filter) {
        return AssessmentSoundType::None;
    }
    if attribute.short_term.is_poor_performing() {
        if settings.mute_poor_assessment_sound {
            AssessmentSoundType::None
        } else {
            AssessmentSoundType::PoorAssessment
        }
    } else if attribute.short_term.is_good_performing() && !settings.mute_good_assessment_sound {
        AssessmentSoundType::GoodAssessment
    } else {
        AssessmentSoundType::None
    }
}

/// A new assessment is only audible when both its timestamp and level moved.
fn is_audible_change(previous: &PerformanceStateAttribute, next: &PerformanceStateAttribute) -> bool {
    previous.short_term_timestamp != next.short_term_timestamp
        && previous.short_term != next.short_term
}

/// Rendered concept node plus, in tree layout, its rendered children.
pub struct ConceptItem {
    state: ConceptPerformanceState,
    highlights: NodeHighlights,
    children: ConceptList,
    visible: bool,
    update_count: usize,
    redraw_count: usize,
}

impl ConceptItem {
    /// New items never request a sound.
    fn new(state: ConceptPerformanceState, ctx: &RedrawContext<'_>) -> Self {
        let mut item = Self {
            highlights: NodeHighlights::evaluate(
                &state.state,
                state.contains_observed_assessment_condition,
                ctx.settings,
            ),
            state,
            children: ConceptList::default(),
            visible: true,
            update_count: 0,
            redraw_count: 0,
        };
        item.redraw_children(false, ctx);
        item
    }

    fn update(
        &mut self,
        state: ConceptPerformanceState,
        update_state_on_redraw: bool,
        ctx: &RedrawContext<'_>,
    ) -> AssessmentSoundType {
        let allow = is_audible_change(&self.state.state, &state.state);
        self.state = state;
        self.update_count += 1;
        self.refresh(allow, ctx)
            .combine(self.redraw_children(update_state_on_redraw, ctx))
    }

    fn redraw(&mut self, ctx: &RedrawContext<'_>) -> AssessmentSoundType {
        self.redraw_count += 1;
        self.refresh(false, ctx)
            .combine(self.redraw_children(false, ctx))
    }

    fn refresh(&mut self, allow: bool, ctx: &RedrawContext<'_>) -> AssessmentSoundType {
        let observed = self.state.contains_observed_assessment_condition;
        self.highlights = NodeHighlights::evaluate(&self.state.state, observed, ctx.settings);
        requested_sound(&self.state.state, observed, allow, NodeKind::Concept, ctx)
    }

    fn redraw_children(
        &mut self,
        update_state_on_redraw: bool,
        ctx: &RedrawContext<'_>,
    ) -> AssessmentSoundType {
        if ctx.layout != ViewLayout::Tree || !self.state.is_intermediate() {
            return AssessmentSoundType::None;
        }
        self.children
            .reconcile(self.state.children(), update_state_on_redraw, ctx)
    }

    fn apply_concept_filter(&mut self, settings: &DisplaySettings) -> bool {
        self.visible = if self.children.is_empty() {
            !settings.show_oc_only || self.requires_observed_assessment()
        } else {
            self.children.apply_concept_filter(settings)
        };
        self.visible
    }

    pub fn state(&self) -> &ConceptPerformanceState {
        &self.state
    }

    pub fn highlights(&self) -> NodeHighlights {
        self.highlights
    }

    pub fn children(&self) -> &ConceptList {
        &self.children
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn update_count(&self) -> usize {
        self.update_count
    }

    pub fn redraw_count(&self) -> usize {
        self.redraw_count
    }
}

impl PrioritizedNode for ConceptItem {
    fn node_id(&self) -> u32 {
        self.state.node_id()
    }

    fn requires_observed_assessment(&self) -> bool {
        let mut observed = false;
        self.state
            .walk(&mut |node| observed |= node.contains_observed_assessment_condition);
        observed
    }
}

/// Position changes made by the last reconcile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MoveStats {
    pub added: usize,
    pub reinserted: usize,
    pub untouched: usize,
    pub removed: usize,
}

/// Ordered sibling concept items.
#[derive(Default)]
pub struct ConceptList {
    items: Vec<ConceptItem>,
    last_oc_node: Option<u32>,
    last_moves: MoveStats,
}

impl ConceptList {
    /// Brings the rendered items in line with `concepts` and returns the
    /// highest-priority sound requested by any surviving item.
    pub fn reconcile<'c, I>(
        &mut self,
        concepts: I,
        update_state_on_redraw: bool,
        ctx: &RedrawContext<'_>,
    ) -> AssessmentSoundType
    where
        I: IntoIterator<Item = &'c ConceptPerformanceState>,
    {
        let settings = ctx.settings;
        let displayed: Vec<u32> = self.items.iter().map(PrioritizedNode::node_id).collect();
        let mut existing = std::mem::take(&mut self.items);
        let mut next = Vec::with_capacity(existing.len());
        let mut sound = AssessmentSoundType::None;

        for concept in concepts {
            if concept.state.scenario_support && !settings.show_scenario_support {
                continue;
            }
            let previous = existing
                .iter()
                .position(|item| item.node_id() == concept.node_id())
                .map(|index| existing.swap_remove(index));

            match previous {
                None => {
                    // Once shown an item is never hidden again by this rule,
                    // so a concept first drawn as poor stays on screen.
                    if settings.hide_good_auto_assessments
                        && !concept.contains_observed_assessment_condition
                        && !concept.state.short_term.is_poor_performing()
                        && !concept.is_intermediate()
                    {
                        continue;
                    }
                    next.push(ConceptItem::new(concept.clone(), ctx));
                }
                Some(mut item) => {
                    let changed = item.state.state != concept.state;
                    let requested = if concept.is_intermediate() || update_state_on_redraw || changed {
                        item.update(concept.clone(), update_state_on_redraw, ctx)
                    } else {
                        item.redraw(ctx)
                    };
                    sound = sound.combine(requested);
                    next.push(item);
                }
            }
        }

        let before_drop = next.len();
        if ctx.layout == ViewLayout::Tree && settings.hide_good_auto_assessments {
            next.retain(|item| !item.state.is_intermediate() || !item.children.is_empty());
        }

        let mut moves = MoveStats {
            removed: existing.len() + (before_drop - next.len()),
            ..MoveStats::default()
        };
        self.last_oc_node = ctx.prioritizer.sort_by_priority(&mut next, settings);

        let mut order: Vec<u32> = displayed
            .into_iter()
            .filter(|id| next.iter().any(|item| item.node_id() == *id))
            .collect();
        for (index, item) in next.iter().enumerate() {
            let id = item.node_id();
            match order.get(index) {
                Some(current) if *current == id => moves.untouched += 1,
                Some(_) => {
                    match order.iter().position(|shown| *shown == id) {
                        Some(from) => {
                            order.remove(from);
                            moves.reinserted += 1;
                        }
                        None => moves.added += 1,
                    }
                    order.insert(index, id);
                }
                None => {
                    order.push(id);
                    moves.added += 1;
                }
            }
        }

        self.items = next;
        self.last_moves = moves;
        sound
    }

    fn apply_concept_filter(&mut self, settings: &DisplaySettings) -> bool {
        let mut any_shown = false;
        for item in &mut self.items {
            any_shown |= item.apply_concept_filter(settings);
        }
        any_shown
    }

    pub fn items(&self) -> &[ConceptItem] {
        &self.items
    }

    pub fn node_ids(&self) -> Vec<u32> {
        self.items.iter().map(PrioritizedNode::node_id).collect()
    }

    /// Depth-first lookup through rendered descendants.
    pub fn find(&self, node_id: u32) -> Option<&ConceptItem> {
        self.items.iter().find_map(|item| {
            if item.node_id() == node_id {
                Some(item)
            } else {
                item.children.find(node_id)
            }
        })
    }

    pub fn last_oc_node(&self) -> Option<u32> {
        self.last_oc_node
    }

    pub fn last_moves(&self) -> MoveStats {
        self.last_moves
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Incrementally redrawn view of one task's performance state.
pub struct TaskDataView {
    layout: ViewLayout,
    task: Option<TaskPerformanceState>,
    highlights: NodeHighlights,
    concepts: ConceptList,
    logger: LogManager,
}

impl TaskDataView {
    pub fn new(layout: ViewLayout) -> Self {
        Self {
            layout,
            task: None,
            highlights: NodeHighlights::default(),
            concepts: ConceptList::default(),
            logger: LogManager::new("gmcore::panel::performance"),
        }
    }

    /// Takes a new snapshot for the task. The first snapshot never sounds.
    pub fn update_state(
        &mut self,
        task: TaskPerformanceState,
        ctx: &RedrawContext<'_>,
    ) -> AssessmentSoundType {
        let allow = self
            .task
            .as_ref()
            .map(|previous| is_audible_change(&previous.state, &task.state))
            .unwrap_or(false);
        self.task = Some(task);
        self.draw(allow, false, ctx)
    }

    /// Redraws against the last snapshot, e.g. after a settings change.
    pub fn redraw(&mut self, update_state_on_redraw: bool, ctx: &RedrawContext<'_>) -> AssessmentSoundType {
        self.draw(false, update_state_on_redraw, ctx)
    }

    fn draw(
        &mut self,
        allow: bool,
        update_state_on_redraw: bool,
        ctx: &RedrawContext<'_>,
    ) -> AssessmentSoundType {
        let ctx = RedrawContext {
            layout: self.layout,
            ..*ctx
        };
        let Some(task) = self.task.as_ref() else {
            return AssessmentSoundType::None;
        };
        let observed = task.contains_observed_assessment_condition;
        self.highlights = NodeHighlights::evaluate(&task.state, observed, ctx.settings);
        let own = requested_sound(&task.state, observed, allow, NodeKind::Task, &ctx);

        let concepts = match self.layout {
            ViewLayout::List => self
                .concepts
                .reconcile(task.leaf_concepts(), update_state_on_redraw, &ctx),
            ViewLayout::Tree => self
                .concepts
                .reconcile(task.concepts.iter(), update_state_on_redraw, &ctx),
        };
        let sound = own.combine(concepts);
        self.logger.detail(&format!(
            "task {} redrawn with {} concepts, sound {:?}",
            task.state.name,
            self.concepts.len(),
            sound
        ));
        sound
    }

    /// Applies the observed-assessment-only filter. Returns whether any concept is shown.
    pub fn apply_concept_filter(&mut self, settings: &DisplaySettings) -> bool {
        self.concepts.apply_concept_filter(settings)
    }

    pub fn layout(&self) -> ViewLayout {
        self.layout
    }

    pub fn task(&self) -> Option<&TaskPerformanceState> {
        self.task.as_ref()
    }

    pub fn highlights(&self) -> NodeHighlights {
        self.highlights
    }

    pub fn concepts(&self) -> &ConceptList {
        &self.concepts
    }

    pub fn find_concept(&self, node_id: u32) -> Option<&ConceptItem> {
        self.concepts.find(node_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use AssessmentLevel::*;

    fn attr(id: u32, level: AssessmentLevel, timestamp: u64) -> PerformanceStateAttribute {
        let mut attribute = PerformanceStateAttribute::new(id, &format!("concept {}", id), level);
        attribute.short_term_timestamp = timestamp;
        attribute
    }

    fn leaf(id: u32, level: AssessmentLevel, timestamp: u64) -> ConceptPerformanceState {
        ConceptPerformanceState::leaf(attr(id, level, timestamp))
    }

    fn task(concepts: Vec<ConceptPerformanceState>) -> TaskPerformanceState {
        TaskPerformanceState::new(attr(1, Unknown, 0), concepts)
    }

    fn hide_good() -> DisplaySettings {
        DisplaySettings {
            hide_good_auto_assessments: true,
            ..DisplaySettings::default()
        }
    }

    #[test]
    fn good_automated_concept_is_never_created_when_hidden() {
        let settings = hide_good();
        let ctx = RedrawContext::new(&settings);
        let mut view = TaskDataView::new(ViewLayout::List);
        view.update_state(task(vec![leaf(2, AtExpectation, 1), leaf(3, Unknown, 1)]), &ctx);
        assert!(view.concepts().is_empty());

        view.update_state(task(vec![leaf(2, AtExpectation, 1), leaf(3, BelowExpectation, 2)]), &ctx);
        assert_eq!(view.concepts().node_ids(), vec![3]);
    }

    #[test]
    fn concept_shown_as_poor_stays_after_improving() {
        let settings = hide_good();
        let ctx = RedrawContext::new(&settings);
        let mut view = TaskDataView::new(ViewLayout::List);
        view.update_state(task(vec![leaf(2, BelowExpectation, 1)]), &ctx);
        view.update_state(task(vec![leaf(2, AtExpectation, 2)]), &ctx);
        assert_eq!(view.concepts().node_ids(), vec![2]);
    }

    #[test]
    fn poor_sound_outranks_good_sound_in_one_pass() {
        let settings = DisplaySettings::default();
        let ctx = RedrawContext::new(&settings).with_user("observer");
        let mut view = TaskDataView::new(ViewLayout::List);
        let first = view.update_state(task(vec![leaf(2, Unknown, 1), leaf(3, Unknown, 1)]), &ctx);
        assert_eq!(first, AssessmentSoundType::None);

        let sound = view.update_state(
            task(vec![leaf(2, AtExpectation, 2), leaf(3, BelowExpectation, 2)]),
            &ctx,
        );
        assert_eq!(sound, AssessmentSoundType::PoorAssessment);
    }

    #[test]
    fn own_assessment_is_silent_outside_playback() {
        let settings = DisplaySettings::default();
        let live = RedrawContext::new(&settings).with_user("Observer");
        let mut view = TaskDataView::new(ViewLayout::List);
        view.update_state(task(vec![leaf(2, Unknown, 1)]), &live);

        let mut assessed = attr(2, BelowExpectation, 2);
        assessed.evaluator = Some("observer".into());
        let next = task(vec![ConceptPerformanceState::leaf(assessed)]);
        assert_eq!(view.update_state(next.clone(), &live), AssessmentSoundType::None);

        let mut replay = TaskDataView::new(ViewLayout::List);
        let playback = live.in_playback(true);
        replay.update_state(task(vec![leaf(2, Unknown, 1)]), &playback);
        assert_eq!(replay.update_state(next, &playback), AssessmentSoundType::PoorAssessment);
    }

    #[test]
    fn inactive_or_muted_nodes_are_silent() {
        let settings = DisplaySettings {
            mute_good_assessment_sound: true,
            ..DisplaySettings::default()
        };
        let ctx = RedrawContext::new(&settings);
        let mut view = TaskDataView::new(ViewLayout::List);
        view.update_state(task(vec![leaf(2, Unknown, 1), leaf(3, Unknown, 1)]), &ctx);

        let mut finished = attr(3, BelowExpectation, 2);
        finished.node_state = PerformanceNodeState::Finished;
        let sound = view.update_state(
            task(vec![leaf(2, AboveExpectation, 2), ConceptPerformanceState::leaf(finished)]),
            &ctx,
        );
        assert_eq!(sound, AssessmentSoundType::None);
    }

    #[test]
    fn unchanged_timestamp_does_not_replay_sound() {
        let settings = DisplaySettings::default();
        let ctx = RedrawContext::new(&settings);
        let mut view = TaskDataView::new(ViewLayout::List);
        view.update_state(task(vec![leaf(2, Unknown, 5)]), &ctx);
        assert_eq!(
            view.update_state(task(vec![leaf(2, BelowExpectation, 5)]), &ctx),
            AssessmentSoundType::None
        );
        assert_eq!(view.find_concept(2).unwrap().update_count(), 1);
    }

    #[test]
    fn unchanged_concepts_get_a_cheap_redraw() {
        let settings = DisplaySettings::default();
        let ctx = RedrawContext::new(&settings);
        let mut view = TaskDataView::new(ViewLayout::List);
        let snapshot = task(vec![leaf(2, AtExpectation, 1), leaf(3, AtExpectation, 1)]);
        view.update_state(snapshot.clone(), &ctx);
        view.update_state(snapshot, &ctx);
        let item = view.find_concept(2).unwrap();
        assert_eq!((item.update_count(), item.redraw_count()), (0, 1));
        assert_eq!(view.concepts().last_moves().untouched, 2);
    }

    #[test]
    fn observed_concepts_sort_first_with_minimal_moves() {
        let plain = DisplaySettings::default();
        let mut view = TaskDataView::new(ViewLayout::List);
        let concepts = vec![
            leaf(2, AtExpectation, 1),
            leaf(3, Unknown, 1).observed(),
            leaf(4, AtExpectation, 1),
        ];
        view.update_state(task(concepts.clone()), &RedrawContext::new(&plain));
        assert_eq!(view.concepts().node_ids(), vec![2, 3, 4]);
        assert_eq!(view.concepts().last_moves().added, 3);

        let prioritized = DisplaySettings {
            prioritize_oc_assessment: true,
            ..DisplaySettings::default()
        };
        view.redraw(false, &RedrawContext::new(&prioritized));
        assert_eq!(view.concepts().node_ids(), vec![3, 2, 4]);
        assert_eq!(view.concepts().last_oc_node(), Some(3));
        let moves = view.concepts().last_moves();
        assert_eq!((moves.reinserted, moves.untouched, moves.added), (1, 2, 0));
        assert!(view.find_concept(3).unwrap().highlights().observed_assessment_needed);
    }

    #[test]
    fn scenario_support_concepts_follow_the_setting() {
        let mut support = attr(2, AtExpectation, 1);
        support.scenario_support = true;
        let snapshot = task(vec![ConceptPerformanceState::leaf(support), leaf(3, AtExpectation, 1)]);

        let hidden = DisplaySettings::default();
        let mut view = TaskDataView::new(ViewLayout::List);
        view.update_state(snapshot, &RedrawContext::new(&hidden));
        assert_eq!(view.concepts().node_ids(), vec![3]);

        let shown = DisplaySettings {
            show_scenario_support: true,
            ..DisplaySettings::default()
        };
        view.redraw(false, &RedrawContext::new(&shown));
        assert_eq!(view.concepts().node_ids(), vec![2, 3]);
        assert_eq!(view.concepts().last_moves().removed, 0);
    }

    #[test]
    fn tree_view_propagates_child_sounds_through_intermediates() {
        let settings = DisplaySettings::default();
        let ctx = RedrawContext::new(&settings);
        let tree = |level, timestamp| {
            task(vec![ConceptPerformanceState::intermediate(
                attr(2, Unknown, 0),
                vec![leaf(3, level, timestamp), leaf(4, Unknown, 0)],
            )])
        };
        let mut view = TaskDataView::new(ViewLayout::Tree);
        view.update_state(tree(Unknown, 1), &ctx);
        assert_eq!(view.concepts().node_ids(), vec![2]);
        assert_eq!(view.find_concept(2).unwrap().children().node_ids(), vec![3, 4]);

        assert_eq!(view.update_state(tree(BelowExpectation, 2), &ctx), AssessmentSoundType::PoorAssessment);
        let intermediate = view.find_concept(2).unwrap();
        assert_eq!(intermediate.update_count(), 1);
        assert!(view.find_concept(3).unwrap().highlights().below_expectation);
    }

    #[test]
    fn tree_view_drops_intermediates_without_drawn_children() {
        let settings = hide_good();
        let ctx = RedrawContext::new(&settings);
        let mut view = TaskDataView::new(ViewLayout::Tree);
        view.update_state(
            task(vec![
                ConceptPerformanceState::intermediate(attr(2, AtExpectation, 1), vec![leaf(3, AtExpectation, 1)]),
                ConceptPerformanceState::intermediate(attr(4, AtExpectation, 1), vec![leaf(5, BelowExpectation, 1)]),
            ]),
            &ctx,
        );
        assert_eq!(view.concepts().node_ids(), vec![4]);
        assert_eq!(view.find_concept(4).unwrap().children().node_ids(), vec![5]);
    }

    #[test]
    fn oc_only_filter_hides_automated_leaves() {
        let settings = DisplaySettings::default();
        let mut view = TaskDataView::new(ViewLayout::Tree);
        view.update_state(
            task(vec![
                ConceptPerformanceState::intermediate(
                    attr(2, Unknown, 0),
                    vec![leaf(3, Unknown, 0).observed(), leaf(4, AtExpectation, 0)],
                ),
                ConceptPerformanceState::intermediate(attr(5, Unknown, 0), vec![leaf(6, AtExpectation, 0)]),
            ]),
            &RedrawContext::new(&settings),
        );
        let oc_only = DisplaySettings {
            show_oc_only: true,
            ..DisplaySettings::default()
        };
        assert!(view.apply_concept_filter(&oc_only));
        assert!(view.find_concept(2).unwrap().is_visible());
        assert!(view.find_concept(3).unwrap().is_visible());
        assert!(!view.find_concept(4).unwrap().is_visible());
        assert!(!view.find_concept(5).unwrap().is_visible());
    }

    #[test]
    fn highlight_flags_respect_hide_settings() {
        let unknown = attr(2, Unknown, 0);
        let below = attr(3, BelowExpectation, 0);
        let shown = DisplaySettings::default();
        assert!(NodeHighlights::evaluate(&unknown, true, &shown).observed_assessment_needed);
        assert!(!NodeHighlights::evaluate(&unknown, false, &shown).observed_assessment_needed);
        assert!(NodeHighlights::evaluate(&below, false, &shown).below_expectation);

        let hidden = DisplaySettings {
            hide_oc_assessment_visual: true,
            hide_poor_assessment_visual: true,
            ..DisplaySettings::default()
        };
        assert_eq!(NodeHighlights::evaluate(&below, true, &hidden), NodeHighlights::default());

        let mut idle = below.clone();
        idle.node_state = PerformanceNodeState::Unactivated;
        assert!(!NodeHighlights::evaluate(&idle, false, &shown).below_expectation);
    }
}
