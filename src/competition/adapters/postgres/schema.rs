//! Diesel schema for competition persistence.

diesel::table! {
    /// Competition projects and their lifecycle status.
    projects (id) {
        /// Project identifier.
        id -> Uuid,
        /// Display name.
        #[max_length = 255]
        name -> Varchar,
        /// Owning operator.
        owner_id -> Uuid,
        /// Target members per team.
        team_size -> Int4,
        /// Ordered judging criteria.
        criteria -> Jsonb,
        /// Lifecycle status.
        #[max_length = 50]
        status -> Varchar,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last lifecycle timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Committed teams.
    teams (id) {
        /// Team identifier.
        id -> Uuid,
        /// Owning project.
        project_id -> Uuid,
        /// Display name.
        #[max_length = 255]
        name -> Varchar,
        /// Members in formation order.
        member_ids -> Jsonb,
        /// Optional submission reference.
        submission_ref -> Nullable<Text>,
        /// Creation timestamp, used for ranking tie-breaks.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Current score per rater and team.
    ratings (rater_id, team_id) {
        /// Rating identity.
        rater_id -> Uuid,
        /// Rated team.
        team_id -> Uuid,
        /// Score in `0..=10`.
        score -> Int2,
        /// Latest submission time.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Frozen ranking rows, written once per project.
    ranking_entries (project_id, team_id) {
        /// Ranked project.
        project_id -> Uuid,
        /// Ranked team.
        team_id -> Uuid,
        /// Dense 1-based rank.
        rank -> Int4,
        /// Freeze timestamp.
        frozen_at -> Timestamptz,
    }
}

diesel::joinable!(teams -> projects (project_id));
diesel::joinable!(ratings -> teams (team_id));
diesel::joinable!(ranking_entries -> projects (project_id));

diesel::allow_tables_to_appear_in_same_query!(projects, teams, ratings, ranking_entries);
