/// The five tuner channels. Each carries a canned podcast script template;
/// there is no real generation backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Theme {
    Productivity,
    Focus,
    DailyFlow,
    Discovery,
    Entertainment,
}

pub const ALL_THEMES: [Theme; 5] = [
    Theme::Productivity,
    Theme::Focus,
    Theme::DailyFlow,
    Theme::Discovery,
    Theme::Entertainment,
];

impl Theme {
    pub fn label(&self) -> &'static str {
        match self {
            Theme::Productivity => "Productivity",
            Theme::Focus => "Focus",
            Theme::DailyFlow => "Daily Flow",
            Theme::Discovery => "Discovery",
            Theme::Entertainment => "Entertainment",
        }
    }

    pub fn from_label(label: &str) -> Option<Theme> {
        ALL_THEMES.iter().copied().find(|t| t.label().eq_ignore_ascii_case(label))
    }

    /// Script template: `[Header]` section markers followed by body lines.
    pub fn template(&self) -> &'static str {
        match self {
            Theme::Productivity => {
                "[Intro]\n\
                 Welcome back to your Productivity boost. Today we are focusing on streamlining your workflow for maximum efficiency.\n\
                 [Body]\n\
                 Let's look at your current tasks. You have a few meetings lined up and a project deadline approaching.\n\
                 To handle this, try the time-blocking method. Allocating specific hours for deep work can significantly reduce context switching.\n\
                 Remember to take short breaks to keep your mind fresh.\n\
                 [Outro]\n\
                 Stay focused and conquer your day. You have the tools to succeed.\n"
            }
            Theme::Focus => {
                "[Intro]\n\
                 Enter the zone of deep focus. This session is designed to eliminate distractions and enhance concentration.\n\
                 [Body]\n\
                 Your notes mention a need for clarity on the upcoming project.\n\
                 Let's prioritize the most critical task first. Close unrelated tabs and put your phone on silence.\n\
                 Visualizing the end result can also provide the motivation needed to start.\n\
                 [Outro]\n\
                 Keep this momentum going. Your ability to focus is your superpower.\n"
            }
            Theme::DailyFlow => {
                "[Intro]\n\
                 Hello and welcome to your Daily Flow. Let's get in sync with your rhythm for today.\n\
                 [Body]\n\
                 It seems like a balanced day ahead. You have a mix of creative work and administrative duties.\n\
                 Try to tackle the creative tasks when your energy is highest.\n\
                 Transition smoothly between tasks by taking a moment to breathe and reset.\n\
                 [Outro]\n\
                 Flow through your day with ease. You are doing great.\n"
            }
            Theme::Discovery => {
                "[Intro]\n\
                 Welcome to Discovery. It is time to explore new ideas and broaden your horizons.\n\
                 [Body]\n\
                 Your notes suggest an interest in learning a new skill.\n\
                 Why not dedicate twenty minutes today to research or practice?\n\
                 Small, consistent steps lead to big discoveries over time.\n\
                 Keep an open mind and see where your curiosity takes you.\n\
                 [Outro]\n\
                 Adventure awaits in every new piece of knowledge. Enjoy the journey.\n"
            }
            Theme::Entertainment => {
                "[Intro]\n\
                 Time to unwind with Entertainment. Let's take a break and recharge your batteries.\n\
                 [Body]\n\
                 You have been working hard, so you deserve some leisure time.\n\
                 Maybe catch up on that show you've been watching or listen to your favorite album.\n\
                 Relaxation is a key part of productivity, so don't feel guilty about resting.\n\
                 [Outro]\n\
                 Enjoy your downtime. You will come back stronger.\n"
            }
        }
    }
}
