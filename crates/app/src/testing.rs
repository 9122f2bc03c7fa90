//! In-memory port implementations shared by the service tests.
//!
//! A single [`InMemory`] value implements every repository trait over one
//! shared state, so cross-table rules (area usage, evidence averages) behave
//! like the real store.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, MutexGuard};

use plan_accion_domain::area::{Area, AreaUsage, NewArea};
use plan_accion_domain::axis::{Axis, AxisTracking, NewAxis, NewSubAxis, SubAxis};
use plan_accion_domain::error::{ConflictError, PlanError};
use plan_accion_domain::evidence::{
    Evidence, EvidenceFilter, EvidenceKey, EvidenceReview, EvidenceSubmission,
};
use plan_accion_domain::goal::{Goal, GoalFilter, NewGoal};
use plan_accion_domain::grade::{GradeEntry, GradeFilter, QuarterGrade};
use plan_accion_domain::id::{
    AreaId, AxisId, EvidenceId, GoalId, GradeId, SubAxisId, UserId, WindowId,
};
use plan_accion_domain::period::{Period, Quarter, Year};
use plan_accion_domain::score::Score;
use plan_accion_domain::selection::QuarterSelection;
use plan_accion_domain::submission_window::{NewSubmissionWindow, SubmissionWindow};
use plan_accion_domain::time::Timestamp;
use plan_accion_domain::user::{Email, NewUser, Role, User, UserStatus};

use crate::ports::{
    AreaRepository, AxisRepository, EvidenceRepository, GoalRepository, GradeRepository,
    PasswordHasher, SelectionRepository, SubmissionWindowRepository, UserRepository,
};

#[derive(Default)]
pub struct State {
    next_id: i64,
    pub users: BTreeMap<UserId, User>,
    pub areas: BTreeMap<AreaId, Area>,
    pub axes: BTreeMap<AxisId, Axis>,
    pub sub_axes: BTreeMap<SubAxisId, SubAxis>,
    pub tracking: HashMap<(AreaId, AxisId, Quarter), AxisTracking>,
    pub goals: BTreeMap<GoalId, Goal>,
    pub evidence: BTreeMap<EvidenceId, Evidence>,
    pub grades: BTreeMap<GradeId, QuarterGrade>,
    pub selections: HashMap<(UserId, Period), QuarterSelection>,
    pub windows: BTreeMap<WindowId, SubmissionWindow>,
}

impl State {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }
}

/// Every repository port backed by one shared in-memory state.
#[derive(Clone, Default)]
pub struct InMemory(Arc<Mutex<State>>);

impl InMemory {
    pub fn state(&self) -> MutexGuard<'_, State> {
        self.0.lock().unwrap()
    }

    /// Insert a user directly, bypassing the service layer.
    pub fn seed_user(&self, user: User) -> User {
        self.state().users.insert(user.id, user.clone());
        user
    }

    pub fn seed_area(&self, name: &str) -> Area {
        let mut state = self.state();
        let area = Area {
            id: AreaId::new(state.next_id()),
            name: name.to_string(),
            description: None,
        };
        state.areas.insert(area.id, area.clone());
        area
    }

    pub fn seed_goal(&self, user_id: UserId, area_id: AreaId) -> Goal {
        let mut state = self.state();
        let goal = Goal {
            id: GoalId::new(state.next_id()),
            user_id,
            area_id,
            axis_id: None,
            sub_axis_id: None,
            text: "Meta de prueba".to_string(),
            status: plan_accion_domain::goal::GoalStatus::Pending,
            created_at: plan_accion_domain::time::now(),
        };
        state.goals.insert(goal.id, goal.clone());
        goal
    }
}

pub fn admin(id: i64) -> User {
    User {
        role: Role::Admin,
        ..member(id, None)
    }
}

pub fn member(id: i64, area: Option<i64>) -> User {
    User {
        id: UserId::new(id),
        email: Email::parse(&format!("user{id}@example.org")).unwrap(),
        password_hash: FakeHasher.hash("password123").unwrap(),
        name: format!("User {id}"),
        role: Role::User,
        status: UserStatus::Active,
        area_id: area.map(AreaId::new),
        photo_url: None,
        requested_area: None,
        created_at: plan_accion_domain::time::now(),
    }
}

pub fn period(quarter: i64, year: i64) -> Period {
    Period::new(Quarter::new(quarter).unwrap(), Year::new(year).unwrap())
}

/// Reversible "hash" that keeps tests fast.
#[derive(Clone, Copy, Default)]
pub struct FakeHasher;

impl PasswordHasher for FakeHasher {
    fn hash(&self, password: &str) -> Result<String, PlanError> {
        Ok(format!("fake${password}"))
    }

    fn verify(&self, password: &str, hash: &str) -> Result<bool, PlanError> {
        Ok(hash.strip_prefix("fake$") == Some(password))
    }
}

impl UserRepository for InMemory {
    async fn create(&self, user: NewUser) -> Result<User, PlanError> {
        let mut state = self.state();
        if state.users.values().any(|u| u.email == user.email) {
            return Err(ConflictError::Duplicate.into());
        }
        let created = User {
            id: UserId::new(state.next_id()),
            email: user.email,
            password_hash: user.password_hash,
            name: user.name,
            role: user.role,
            status: user.status,
            area_id: None,
            photo_url: None,
            requested_area: user.requested_area,
            created_at: user.created_at,
        };
        state.users.insert(created.id, created.clone());
        Ok(created)
    }

    async fn get_by_id(&self, id: UserId) -> Result<Option<User>, PlanError> {
        Ok(self.state().users.get(&id).cloned())
    }

    async fn get_by_email(&self, email: &Email) -> Result<Option<User>, PlanError> {
        Ok(self
            .state()
            .users
            .values()
            .find(|u| &u.email == email)
            .cloned())
    }

    async fn list(&self, status: Option<UserStatus>) -> Result<Vec<User>, PlanError> {
        Ok(self
            .state()
            .users
            .values()
            .rev()
            .filter(|u| status.is_none_or(|s| u.status == s))
            .cloned()
            .collect())
    }

    async fn update(&self, user: User) -> Result<User, PlanError> {
        let mut state = self.state();
        let stored = state
            .users
            .get_mut(&user.id)
            .ok_or_else(|| PlanError::not_found("User", user.id))?;
        let role = stored.role;
        *stored = User { role, ..user };
        Ok(stored.clone())
    }

    async fn set_role_unless_last_admin(&self, id: UserId, role: Role) -> Result<bool, PlanError> {
        let mut state = self.state();
        let admins = state.users.values().filter(|u| u.is_active_admin()).count();
        let Some(user) = state.users.get_mut(&id) else {
            return Ok(false);
        };
        if user.is_active_admin() && role != Role::Admin && admins <= 1 {
            return Ok(false);
        }
        user.role = role;
        Ok(true)
    }

    async fn delete_unless_last_admin(&self, id: UserId) -> Result<bool, PlanError> {
        let mut state = self.state();
        let admins = state.users.values().filter(|u| u.is_active_admin()).count();
        match state.users.get(&id) {
            Some(user) if user.is_active_admin() && admins <= 1 => Ok(false),
            Some(_) => {
                state.users.remove(&id);
                state.goals.retain(|_, g| g.user_id != id);
                state.evidence.retain(|_, e| e.key.user_id != id);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn count_admins(&self) -> Result<i64, PlanError> {
        let count = self.state().users.values().filter(|u| u.is_active_admin()).count();
        Ok(i64::try_from(count).unwrap())
    }
}

impl AreaRepository for InMemory {
    async fn create(&self, area: NewArea) -> Result<Area, PlanError> {
        let mut state = self.state();
        if state.areas.values().any(|a| a.name == area.name) {
            return Err(ConflictError::Duplicate.into());
        }
        let created = Area {
            id: AreaId::new(state.next_id()),
            name: area.name,
            description: area.description,
        };
        state.areas.insert(created.id, created.clone());
        Ok(created)
    }

    async fn get_by_id(&self, id: AreaId) -> Result<Option<Area>, PlanError> {
        Ok(self.state().areas.get(&id).cloned())
    }

    async fn get_all(&self) -> Result<Vec<Area>, PlanError> {
        let mut areas: Vec<Area> = self.state().areas.values().cloned().collect();
        areas.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(areas)
    }

    async fn update(&self, area: Area) -> Result<Area, PlanError> {
        self.state().areas.insert(area.id, area.clone());
        Ok(area)
    }

    async fn delete(&self, id: AreaId) -> Result<bool, PlanError> {
        Ok(self.state().areas.remove(&id).is_some())
    }

    async fn count_dependents(&self, id: AreaId) -> Result<AreaUsage, PlanError> {
        let state = self.state();
        let users = state.users.values().filter(|u| u.area_id == Some(id)).count();
        let goals = state.goals.values().filter(|g| g.area_id == id).count();
        Ok(AreaUsage {
            users: i64::try_from(users).unwrap(),
            goals: i64::try_from(goals).unwrap(),
        })
    }
}

impl AxisRepository for InMemory {
    async fn create_axis(&self, axis: NewAxis) -> Result<Axis, PlanError> {
        let mut state = self.state();
        let created = Axis {
            id: AxisId::new(state.next_id()),
            name: axis.name,
            description: axis.description,
        };
        state.axes.insert(created.id, created.clone());
        Ok(created)
    }

    async fn get_axis(&self, id: AxisId) -> Result<Option<Axis>, PlanError> {
        Ok(self.state().axes.get(&id).cloned())
    }

    async fn list_axes(&self) -> Result<Vec<Axis>, PlanError> {
        Ok(self.state().axes.values().cloned().collect())
    }

    async fn update_axis(&self, axis: Axis) -> Result<Axis, PlanError> {
        self.state().axes.insert(axis.id, axis.clone());
        Ok(axis)
    }

    async fn delete_axis(&self, id: AxisId) -> Result<bool, PlanError> {
        let mut state = self.state();
        state.sub_axes.retain(|_, s| s.axis_id != id);
        state.tracking.retain(|key, _| key.1 != id);
        Ok(state.axes.remove(&id).is_some())
    }

    async fn create_sub_axis(&self, sub_axis: NewSubAxis) -> Result<SubAxis, PlanError> {
        let mut state = self.state();
        let created = SubAxis {
            id: SubAxisId::new(state.next_id()),
            axis_id: sub_axis.axis_id,
            name: sub_axis.name,
        };
        state.sub_axes.insert(created.id, created.clone());
        Ok(created)
    }

    async fn get_sub_axis(&self, id: SubAxisId) -> Result<Option<SubAxis>, PlanError> {
        Ok(self.state().sub_axes.get(&id).cloned())
    }

    async fn list_sub_axes(&self, axis_id: Option<AxisId>) -> Result<Vec<SubAxis>, PlanError> {
        Ok(self
            .state()
            .sub_axes
            .values()
            .filter(|s| axis_id.is_none_or(|a| s.axis_id == a))
            .cloned()
            .collect())
    }

    async fn delete_sub_axis(&self, id: SubAxisId) -> Result<bool, PlanError> {
        Ok(self.state().sub_axes.remove(&id).is_some())
    }

    async fn upsert_tracking(&self, tracking: AxisTracking) -> Result<AxisTracking, PlanError> {
        let key = (tracking.area_id, tracking.axis_id, tracking.quarter);
        self.state().tracking.insert(key, tracking.clone());
        Ok(tracking)
    }

    async fn list_tracking(
        &self,
        area_id: AreaId,
        quarter: Option<Quarter>,
    ) -> Result<Vec<AxisTracking>, PlanError> {
        Ok(self
            .state()
            .tracking
            .values()
            .filter(|t| t.area_id == area_id && quarter.is_none_or(|q| t.quarter == q))
            .cloned()
            .collect())
    }
}

impl GoalRepository for InMemory {
    async fn create(&self, goal: NewGoal) -> Result<Goal, PlanError> {
        let mut state = self.state();
        let created = Goal {
            id: GoalId::new(state.next_id()),
            user_id: goal.user_id,
            area_id: goal.area_id,
            axis_id: goal.axis_id,
            sub_axis_id: goal.sub_axis_id,
            text: goal.text,
            status: goal.status,
            created_at: goal.created_at,
        };
        state.goals.insert(created.id, created.clone());
        Ok(created)
    }

    async fn get_by_id(&self, id: GoalId) -> Result<Option<Goal>, PlanError> {
        Ok(self.state().goals.get(&id).cloned())
    }

    async fn list(&self, filter: GoalFilter) -> Result<Vec<Goal>, PlanError> {
        Ok(self
            .state()
            .goals
            .values()
            .filter(|g| filter.user_id.is_none_or(|u| g.user_id == u))
            .filter(|g| filter.area_id.is_none_or(|a| g.area_id == a))
            .cloned()
            .collect())
    }

    async fn update(&self, goal: Goal) -> Result<Goal, PlanError> {
        self.state().goals.insert(goal.id, goal.clone());
        Ok(goal)
    }

    async fn delete(&self, id: GoalId) -> Result<bool, PlanError> {
        let mut state = self.state();
        state.evidence.retain(|_, e| e.key.goal_id != id);
        Ok(state.goals.remove(&id).is_some())
    }
}

impl EvidenceRepository for InMemory {
    async fn open_slot(&self, key: EvidenceKey, at: Timestamp) -> Result<bool, PlanError> {
        let mut state = self.state();
        if state.evidence.values().any(|e| e.key == key) {
            return Ok(false);
        }
        let id = EvidenceId::new(state.next_id());
        state.evidence.insert(
            id,
            Evidence {
                id,
                key,
                file: None,
                score: None,
                observation: None,
                window_id: None,
                created_at: at,
                updated_at: at,
            },
        );
        Ok(true)
    }

    async fn submit(&self, submission: EvidenceSubmission) -> Result<Evidence, PlanError> {
        let mut state = self.state();
        if let Some(existing) = state
            .evidence
            .values_mut()
            .find(|e| e.key == submission.key)
        {
            existing.file = Some(submission.file);
            existing.score = None;
            existing.observation = None;
            existing.window_id = submission.window_id;
            existing.updated_at = submission.submitted_at;
            return Ok(existing.clone());
        }
        let id = EvidenceId::new(state.next_id());
        let created = Evidence {
            id,
            key: submission.key,
            file: Some(submission.file),
            score: None,
            observation: None,
            window_id: submission.window_id,
            created_at: submission.submitted_at,
            updated_at: submission.submitted_at,
        };
        state.evidence.insert(id, created.clone());
        Ok(created)
    }

    async fn get_by_id(&self, id: EvidenceId) -> Result<Option<Evidence>, PlanError> {
        Ok(self.state().evidence.get(&id).cloned())
    }

    async fn list(&self, filter: EvidenceFilter) -> Result<Vec<Evidence>, PlanError> {
        let state = self.state();
        Ok(state
            .evidence
            .values()
            .filter(|e| filter.user_id.is_none_or(|u| e.key.user_id == u))
            .filter(|e| filter.goal_id.is_none_or(|g| e.key.goal_id == g))
            .filter(|e| filter.quarter.is_none_or(|q| e.key.period.quarter == q))
            .filter(|e| filter.year.is_none_or(|y| e.key.period.year == y))
            .filter(|e| {
                filter.area_id.is_none_or(|a| {
                    state
                        .goals
                        .get(&e.key.goal_id)
                        .is_some_and(|g| g.area_id == a)
                })
            })
            .cloned()
            .collect())
    }

    async fn review(
        &self,
        id: EvidenceId,
        review: EvidenceReview,
        at: Timestamp,
    ) -> Result<Option<Evidence>, PlanError> {
        let mut state = self.state();
        Ok(state.evidence.get_mut(&id).map(|e| {
            e.score = Some(review.score);
            e.observation = review.observation;
            e.updated_at = at;
            e.clone()
        }))
    }

    async fn delete(&self, id: EvidenceId) -> Result<bool, PlanError> {
        Ok(self.state().evidence.remove(&id).is_some())
    }

    async fn average_score(
        &self,
        user_id: UserId,
        area_id: AreaId,
        period: Period,
    ) -> Result<Option<Score>, PlanError> {
        let state = self.state();
        let scores: Vec<Score> = state
            .evidence
            .values()
            .filter(|e| e.key.user_id == user_id && e.key.period == period)
            .filter(|e| {
                state
                    .goals
                    .get(&e.key.goal_id)
                    .is_some_and(|g| g.area_id == area_id)
            })
            .filter_map(|e| e.score)
            .collect();
        Ok(Score::average(&scores))
    }
}

impl GradeRepository for InMemory {
    async fn upsert(&self, entry: GradeEntry) -> Result<QuarterGrade, PlanError> {
        let mut state = self.state();
        let existing = state
            .grades
            .values()
            .find(|g| {
                g.user_id == entry.user_id && g.area_id == entry.area_id && g.period == entry.period
            })
            .map(|g| g.id);
        let id = match existing {
            Some(id) => id,
            None => GradeId::new(state.next_id()),
        };
        let grade = QuarterGrade {
            id,
            user_id: entry.user_id,
            area_id: entry.area_id,
            period: entry.period,
            score: entry.score,
            auto_calculated: entry.auto_calculated,
            graded_by: Some(entry.graded_by),
            graded_at: entry.graded_at,
        };
        state.grades.insert(id, grade.clone());
        Ok(grade)
    }

    async fn list(&self, filter: GradeFilter) -> Result<Vec<QuarterGrade>, PlanError> {
        Ok(self
            .state()
            .grades
            .values()
            .filter(|g| filter.user_id.is_none_or(|u| g.user_id == u))
            .filter(|g| filter.area_id.is_none_or(|a| g.area_id == a))
            .filter(|g| filter.quarter.is_none_or(|q| g.period.quarter == q))
            .filter(|g| filter.year.is_none_or(|y| g.period.year == y))
            .cloned()
            .collect())
    }
}

impl SelectionRepository for InMemory {
    async fn upsert(&self, selection: QuarterSelection) -> Result<QuarterSelection, PlanError> {
        self.state()
            .selections
            .insert((selection.user_id, selection.period), selection.clone());
        Ok(selection)
    }

    async fn list_for_user(
        &self,
        user_id: UserId,
        year: Option<Year>,
    ) -> Result<Vec<QuarterSelection>, PlanError> {
        let mut selections: Vec<QuarterSelection> = self
            .state()
            .selections
            .values()
            .filter(|s| s.user_id == user_id && year.is_none_or(|y| s.period.year == y))
            .cloned()
            .collect();
        selections.sort_by_key(|s| (s.period.year, s.period.quarter));
        Ok(selections)
    }
}

impl SubmissionWindowRepository for InMemory {
    async fn create(&self, window: NewSubmissionWindow) -> Result<SubmissionWindow, PlanError> {
        let mut state = self.state();
        if state.windows.values().any(|w| w.period == window.period) {
            return Err(ConflictError::Duplicate.into());
        }
        let created = SubmissionWindow {
            id: WindowId::new(state.next_id()),
            period: window.period,
            opens_at: window.opens_at,
            closes_at: window.closes_at,
            created_at: plan_accion_domain::time::now(),
        };
        state.windows.insert(created.id, created.clone());
        Ok(created)
    }

    async fn get_all(&self) -> Result<Vec<SubmissionWindow>, PlanError> {
        Ok(self.state().windows.values().cloned().collect())
    }

    async fn find_for_period(&self, period: Period) -> Result<Option<SubmissionWindow>, PlanError> {
        Ok(self
            .state()
            .windows
            .values()
            .find(|w| w.period == period)
            .cloned())
    }

    async fn delete(&self, id: WindowId) -> Result<bool, PlanError> {
        Ok(self.state().windows.remove(&id).is_some())
    }
}
