use chrono::NaiveDate;
use serde_json::Value;
use tracing::{info, warn};

use super::client::ApiClient;
use super::models::{
    Attendance, Candidate, CheckIn, Credentials, DashboardStats, GroupMember, LoginResponse,
    Profile, Program, QrCode, RoleInfo,
};
use crate::calendar::Session;
use crate::error::{ApiError, ApiResult};
use crate::session::{AuthSession, Role};

pub const PERIODS: &str = "periodos";
pub const PARENT_EVENTS: &str = "eventos-generales";
pub const GENERAL_GROUPS: &str = "grupos-generales";
pub const SMALL_GROUPS: &str = "grupos-pequenos";
pub const GROUP_MEMBERS: &str = "grupo-participantes";
pub const SESSIONS: &str = "eventos-especificos";
pub const USERS: &str = "users";
pub const PEOPLE: &str = "personas";

impl ApiClient {
    // ── auth ──

    /// Exchanges credentials for a session. The returned session is not attached yet.
    pub async fn login(&self, username: &str, password: &str) -> ApiResult<AuthSession> {
        if username.trim().is_empty() || password.is_empty() {
            return Err(ApiError::validation("Por favor completa todos los campos."));
        }
        let credentials = Credentials {
            username: username.trim().to_string(),
            password: password.to_string(),
        };
        let response: LoginResponse = self.post("/auth/login", &credentials).await?;
        info!(username = %credentials.username, "logged in");
        Ok(AuthSession {
            token: response.token,
            username: response.username.unwrap_or(credentials.username),
            role: Role::parse(response.role.as_deref()),
            persona_id: response.persona_id,
        })
    }

    // ── own profile ──

    pub async fn my_profile(&self) -> ApiResult<Profile> {
        self.get(&format!("/{PEOPLE}/my-profile")).await
    }

    /// Saves the profile and returns what the backend stored.
    pub async fn update_profile(&self, profile: &Profile) -> ApiResult<Option<Profile>> {
        if profile.full_name.trim().is_empty() {
            return Err(ApiError::validation("El nombre completo es obligatorio"));
        }
        self.put(&format!("/{PEOPLE}/{}", profile.id), profile).await
    }

    // ── sessions ──

    pub async fn sessions_on(&self, date: NaiveDate) -> ApiResult<Vec<Session>> {
        let fecha = date.format("%Y-%m-%d").to_string();
        let sessions: Option<Vec<Session>> = self
            .get_query(&format!("/{SESSIONS}/fecha"), &[("fecha", fecha)])
            .await?;
        Ok(sessions.unwrap_or_default())
    }

    pub async fn my_sessions(&self) -> ApiResult<Vec<Session>> {
        let sessions: Option<Vec<Session>> =
            self.get(&format!("/{SESSIONS}/mis-sesiones")).await?;
        Ok(sessions.unwrap_or_default())
    }

    // ── small groups and membership ──

    /// People eligible for groups under `general_group_id`, optionally narrowed to one cycle.
    pub async fn available_candidates(
        &self,
        general_group_id: i64,
        cycle: Option<&str>,
    ) -> ApiResult<Vec<Candidate>> {
        let path = format!("/{SMALL_GROUPS}/disponibles/{general_group_id}");
        let candidates: Option<Vec<Candidate>> = match cycle {
            Some(cycle) => self.get_query(&path, &[("ciclo", cycle)]).await?,
            None => self.get(&path).await?,
        };
        Ok(candidates.unwrap_or_default())
    }

    pub async fn group_members(&self, small_group_id: i64) -> ApiResult<Vec<GroupMember>> {
        let members: Option<Vec<GroupMember>> = self
            .get(&format!("/{GROUP_MEMBERS}/grupo-pequeno/{small_group_id}"))
            .await?;
        Ok(members.unwrap_or_default())
    }

    pub async fn add_member(&self, small_group_id: i64, persona_id: i64) -> ApiResult<()> {
        let body = serde_json::json!({
            "grupoPequenoId": small_group_id,
            "personaId": persona_id,
        });
        let _: Option<Value> = self.post(&format!("/{GROUP_MEMBERS}"), &body).await?;
        Ok(())
    }

    pub async fn remove_member(&self, membership_id: i64) -> ApiResult<()> {
        self.delete(&format!("/{GROUP_MEMBERS}/{membership_id}"))
            .await
    }

    // ── users ──

    pub async fn roles(&self) -> ApiResult<Vec<RoleInfo>> {
        let roles: Option<Vec<RoleInfo>> = self.get("/roles").await?;
        Ok(roles.unwrap_or_default())
    }

    pub async fn programs(&self) -> ApiResult<Vec<Program>> {
        let programs: Option<Vec<Program>> = self.get("/programas").await?;
        Ok(programs.unwrap_or_default())
    }

    /// Leaders not yet assigned to a small group; `keep` stays eligible when editing its group.
    pub async fn available_leaders(&self, keep: Option<i64>) -> ApiResult<Vec<Candidate>> {
        let path = format!("/{USERS}/lideres-disponibles");
        let leaders: Option<Vec<Candidate>> = match keep {
            Some(id) => {
                self.get_query(&path, &[("excludeGrupoPequenoId", id)])
                    .await?
            }
            None => self.get(&path).await?,
        };
        Ok(leaders.unwrap_or_default())
    }

    // ── attendance ──

    pub async fn generate_qr(&self, session_id: i64, leader_id: i64) -> ApiResult<QrCode> {
        self.get(&format!(
            "/asistencias/generar-qr/{session_id}/lider/{leader_id}"
        ))
        .await
    }

    pub async fn register_attendance(&self, check_in: &CheckIn) -> ApiResult<()> {
        let _: Option<Value> = self.post("/asistencias/registrar-qr", check_in).await?;
        info!(session = check_in.session_id, "attendance registered");
        Ok(())
    }

    // ── dashboard ──

    /// Headline counts for the admin dashboard. Any failing call zeroes every count.
    pub async fn dashboard_stats(&self, today: NaiveDate) -> DashboardStats {
        match self.try_dashboard_stats(today).await {
            Ok(stats) => stats,
            Err(err) => {
                warn!(error = %err, "dashboard stats unavailable");
                DashboardStats::default()
            }
        }
    }

    async fn try_dashboard_stats(&self, today: NaiveDate) -> ApiResult<DashboardStats> {
        let fecha = today.format("%Y-%m-%d").to_string();
        let people_path = format!("/{PEOPLE}");
        let active_path = format!("/{PARENT_EVENTS}/activos");
        let active_query = [("fecha", fecha.as_str())];
        let (people, enrollments, active, attendance) = tokio::try_join!(
            self.get::<Option<Vec<Value>>>(&people_path),
            self.get::<Option<Vec<Value>>>("/matriculas"),
            self.get_query::<Option<Vec<Value>>, _>(
                &active_path,
                &active_query
            ),
            self.get::<Option<Vec<Attendance>>>("/asistencias"),
        )?;

        Ok(DashboardStats {
            people: people.map_or(0, |v| v.len()),
            enrollments: enrollments.map_or(0, |v| v.len()),
            active_events: active.map_or(0, |v| v.len()),
            attendance_today: attendance
                .unwrap_or_default()
                .iter()
                .filter(|a| a.registered_at.as_deref().is_some_and(|r| r.starts_with(&fecha)))
                .count(),
        })
    }
}
