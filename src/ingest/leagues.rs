/// A league the pipeline keeps current
#[derive(Debug, Clone, Copy)]
pub struct SupportedLeague {
    /// Internal identifier
    pub id: u32,

    pub name: &'static str,
    pub country: &'static str,

    /// League id in the source API
    pub api_id: i64,

    /// Inactive leagues are configured but skipped by the pipeline
    pub active: bool,

    /// Lower value = processed first
    pub priority: u8,
}

/// Leagues the service tracks. Ordered by priority at the call site.
pub const SUPPORTED_LEAGUES: &[SupportedLeague] = &[
    SupportedLeague {
        id: 1,
        name: "Premier League",
        country: "England",
        api_id: 39,
        active: true,
        priority: 1,
    },
    SupportedLeague {
        id: 2,
        name: "La Liga",
        country: "Spain",
        api_id: 140,
        active: true,
        priority: 2,
    },
    SupportedLeague {
        id: 3,
        name: "Serie A",
        country: "Italy",
        api_id: 135,
        active: true,
        priority: 3,
    },
    SupportedLeague {
        id: 4,
        name: "Bundesliga",
        country: "Germany",
        api_id: 78,
        active: true,
        priority: 4,
    },
    SupportedLeague {
        id: 5,
        name: "Ligue 1",
        country: "France",
        api_id: 61,
        active: true,
        priority: 5,
    },
    SupportedLeague {
        id: 6,
        name: "Eredivisie",
        country: "Netherlands",
        api_id: 88,
        active: false,
        priority: 6,
    },
];

/// Active leagues in priority order
pub fn active_leagues() -> Vec<SupportedLeague> {
    let mut leagues: Vec<SupportedLeague> = SUPPORTED_LEAGUES
        .iter()
        .copied()
        .filter(|l| l.active)
        .collect();
    leagues.sort_by_key(|l| l.priority);
    leagues
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_active_leagues_sorted_and_filtered() {
        let leagues = active_leagues();
        assert!(leagues.iter().all(|l| l.active));
        assert!(leagues.windows(2).all(|w| w[0].priority <= w[1].priority));
        // The inactive Eredivisie entry is configured but skipped
        assert!(leagues.iter().all(|l| l.api_id != 88));
    }
}
