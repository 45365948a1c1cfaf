//! Menu state management for the restaurant ratings CLI
//!
//! This module holds the prompt state machine: which question is being asked,
//! what the user's answers so far are, and what the main loop should do next.
//! It performs no I/O itself; `handle_input` returns an `Action` for the caller.

use crate::data::{is_valid_state, Provider, SearchTerm};
use crate::stats::Metric;

/// Typed at any prompt to start over from the city prompt
pub const BACK_COMMAND: &str = "back";

/// Typed at any prompt to quit
pub const EXIT_COMMAND: &str = "exit program";

/// Menu state enum representing the current prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppState {
    /// Waiting for a city name
    CityPrompt,
    /// Waiting for the state the city is in
    StatePrompt { city: String },
    /// Results are stored; waiting for a provider to chart
    ProviderSelect { search: SearchTerm },
    /// Waiting for the statistic to chart
    StatSelect {
        search: SearchTerm,
        provider: Provider,
    },
    /// The user asked to quit
    Exit,
}

/// What the caller should do after an input was handled
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Nothing beyond showing the next prompt
    None,
    /// Fetch and store listings for this city
    Search(SearchTerm),
    /// Chart a statistic for an already stored search
    ShowChart {
        search: SearchTerm,
        provider: Provider,
        metric: Metric,
    },
    /// Stop the program
    Quit,
}

/// Main application struct managing prompt state
#[derive(Debug)]
pub struct App {
    /// Current prompt
    pub state: AppState,
    /// Validation message for the last input, if it was rejected
    pub error: Option<String>,
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

impl App {
    /// Creates a new App waiting at the city prompt
    pub fn new() -> Self {
        Self {
            state: AppState::CityPrompt,
            error: None,
        }
    }

    /// Returns the question to print for the current state
    pub fn prompt(&self) -> &'static str {
        match self.state {
            AppState::CityPrompt => {
                "Enter U.S. city name WITHOUT state (e.g. 'Ann Arbor'), or 'exit program' to quit: "
            }
            AppState::StatePrompt { .. } => {
                "Enter full U.S. state name for the city above (e.g. 'Michigan'), 'back' to start over, or 'exit program' to quit: "
            }
            AppState::ProviderSelect { .. } => {
                "Chart results from 'Google' or 'Yelp'? ('back' for a new search, 'exit program' to quit): "
            }
            AppState::StatSelect { .. } => {
                "Chart 'average rating' or 'average number of ratings'? ('back' for a new search, 'exit program' to quit): "
            }
            AppState::Exit => "",
        }
    }

    /// Returns true once the user has asked to quit
    pub fn should_quit(&self) -> bool {
        self.state == AppState::Exit
    }

    /// Takes the validation message for the last input, if any
    pub fn take_error(&mut self) -> Option<String> {
        self.error.take()
    }

    /// Handles one line of user input and advances the state
    ///
    /// `back` and `exit program` are honoured at every prompt. Invalid input
    /// leaves the state unchanged and sets `error`.
    pub fn handle_input(&mut self, input: &str) -> Action {
        self.error = None;
        let input = input.trim();
        let command = input.to_lowercase();

        if command == EXIT_COMMAND {
            self.state = AppState::Exit;
            return Action::Quit;
        }
        if command == BACK_COMMAND {
            self.state = AppState::CityPrompt;
            return Action::None;
        }

        match std::mem::replace(&mut self.state, AppState::Exit) {
            AppState::CityPrompt => self.handle_city(input),
            AppState::StatePrompt { city } => self.handle_state(city, input),
            AppState::ProviderSelect { search } => self.handle_provider(search, input),
            AppState::StatSelect { search, provider } => {
                self.handle_stat(search, provider, input)
            }
            AppState::Exit => Action::Quit,
        }
    }

    /// Handles end of input as if the user had typed `exit program`
    pub fn handle_eof(&mut self) -> Action {
        self.state = AppState::Exit;
        Action::Quit
    }

    fn handle_city(&mut self, input: &str) -> Action {
        if input.is_empty() {
            self.state = AppState::CityPrompt;
            self.error = Some("Please enter a city name.".to_string());
            return Action::None;
        }

        self.state = AppState::StatePrompt {
            city: input.to_lowercase(),
        };
        Action::None
    }

    fn handle_state(&mut self, city: String, input: &str) -> Action {
        if !is_valid_state(input) {
            self.error = Some(format!(
                "Invalid state name '{}'. Please enter a full U.S. state or territory name.",
                input
            ));
            self.state = AppState::StatePrompt { city };
            return Action::None;
        }

        let search = SearchTerm::new(&city, input);
        self.state = AppState::ProviderSelect {
            search: search.clone(),
        };
        Action::Search(search)
    }

    fn handle_provider(&mut self, search: SearchTerm, input: &str) -> Action {
        match Provider::from_str(input) {
            Some(provider) => {
                self.state = AppState::StatSelect { search, provider };
            }
            None => {
                self.error = Some("Please enter 'Google' or 'Yelp'.".to_string());
                self.state = AppState::ProviderSelect { search };
            }
        }
        Action::None
    }

    fn handle_stat(&mut self, search: SearchTerm, provider: Provider, input: &str) -> Action {
        let Some(metric) = Metric::from_str(input) else {
            self.error = Some(
                "Please enter 'average rating' or 'average number of ratings'.".to_string(),
            );
            self.state = AppState::StatSelect { search, provider };
            return Action::None;
        };

        // After a chart, offer the provider choice again to compare results
        self.state = AppState::ProviderSelect {
            search: search.clone(),
        };
        Action::ShowChart {
            search,
            provider,
            metric,
        }
    }
}
