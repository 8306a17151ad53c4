//! Menu choices and their rendering.

/// One entry of the main menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    Register,
    Login,
    CreateLink,
    ListLinks,
    FollowLink,
    EditLimit,
    DeleteLink,
    Logout,
    Exit,
}

impl MenuChoice {
    /// All entries in display order.
    pub const ALL: [MenuChoice; 9] = [
        MenuChoice::Register,
        MenuChoice::Login,
        MenuChoice::CreateLink,
        MenuChoice::ListLinks,
        MenuChoice::FollowLink,
        MenuChoice::EditLimit,
        MenuChoice::DeleteLink,
        MenuChoice::Logout,
        MenuChoice::Exit,
    ];

    /// Parses the number typed by the user.
    pub fn parse(input: &str) -> Option<Self> {
        let choice = match input.trim() {
            "1" => MenuChoice::Register,
            "2" => MenuChoice::Login,
            "3" => MenuChoice::CreateLink,
            "4" => MenuChoice::ListLinks,
            "5" => MenuChoice::FollowLink,
            "6" => MenuChoice::EditLimit,
            "7" => MenuChoice::DeleteLink,
            "8" => MenuChoice::Logout,
            "0" => MenuChoice::Exit,
            _ => return None,
        };
        Some(choice)
    }

    pub fn key(self) -> char {
        match self {
            MenuChoice::Register => '1',
            MenuChoice::Login => '2',
            MenuChoice::CreateLink => '3',
            MenuChoice::ListLinks => '4',
            MenuChoice::FollowLink => '5',
            MenuChoice::EditLimit => '6',
            MenuChoice::DeleteLink => '7',
            MenuChoice::Logout => '8',
            MenuChoice::Exit => '0',
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            MenuChoice::Register => "Register",
            MenuChoice::Login => "Log in",
            MenuChoice::CreateLink => "Create short link",
            MenuChoice::ListLinks => "List my links",
            MenuChoice::FollowLink => "Follow a link",
            MenuChoice::EditLimit => "Edit click limit",
            MenuChoice::DeleteLink => "Delete link",
            MenuChoice::Logout => "Log out",
            MenuChoice::Exit => "Exit",
        }
    }
}

/// Main menu text, ending with the selection prompt.
pub fn render_menu() -> String {
    let mut text = String::from("\nMain menu:\n");
    for choice in MenuChoice::ALL {
        text.push_str(&format!("{}. {}\n", choice.key(), choice.label()));
    }
    text.push_str("Select an item: ");
    text
}
