pub struct DefaultsConfig {
    pub pae_cutoff: f64,
    pub models: usize,
    pub predictions: usize,
    pub result_template: String,
    pub pdb_name: String,
    pub screen_cutoff: f64,
    pub reference_chain: char,
    pub target_chain: char,
    pub residue_start: isize,
    pub residue_end: isize,
    pub contact_threshold: f64,
    pub key_pairs: Vec<(isize, isize)>,
    pub model_file: String,
    pub request_delay_ms: u64,
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            pae_cutoff: 30.0,
            models: 5,
            predictions: 5,
            result_template: "result_model_{model}_multimer_v3_pred_{pred}".to_string(),
            pdb_name: "ranked_0.pdb".to_string(),
            screen_cutoff: 10.0,
            reference_chain: 'A',
            target_chain: 'B',
            residue_start: 1724,
            residue_end: 1840,
            contact_threshold: 5.0,
            key_pairs: vec![(1750, 1800), (1724, 1840)],
            model_file: "ranked_0.pdb".to_string(),
            request_delay_ms: 1000,
            timeout_secs: 10,
            user_agent: format!("adscreen/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}
