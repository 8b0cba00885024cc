//! League catalog: schedule, venues, news, events, leaderboard and profile.
//!
//! Read-only data keyed by weekday or game id.

use chrono::Datelike;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Weekday {
    Sun,
    Mon,
    Tue,
    Wed,
    Thu,
    Fri,
    Sat,
}

impl Weekday {
    pub const ALL: [Weekday; 7] = [
        Weekday::Sun,
        Weekday::Mon,
        Weekday::Tue,
        Weekday::Wed,
        Weekday::Thu,
        Weekday::Fri,
        Weekday::Sat,
    ];

    /// Today in the server's local time zone
    pub fn today() -> Self {
        chrono::Local::now().weekday().into()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Weekday::Sun => "Sun",
            Weekday::Mon => "Mon",
            Weekday::Tue => "Tue",
            Weekday::Wed => "Wed",
            Weekday::Thu => "Thu",
            Weekday::Fri => "Fri",
            Weekday::Sat => "Sat",
        }
    }
}

impl From<chrono::Weekday> for Weekday {
    fn from(day: chrono::Weekday) -> Self {
        match day {
            chrono::Weekday::Sun => Weekday::Sun,
            chrono::Weekday::Mon => Weekday::Mon,
            chrono::Weekday::Tue => Weekday::Tue,
            chrono::Weekday::Wed => Weekday::Wed,
            chrono::Weekday::Thu => Weekday::Thu,
            chrono::Weekday::Fri => Weekday::Fri,
            chrono::Weekday::Sat => Weekday::Sat,
        }
    }
}

impl std::str::FromStr for Weekday {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Weekday::ALL
            .into_iter()
            .find(|d| d.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("Unknown day '{}'", s))
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PokerGame {
    pub id: &'static str,
    pub day: Weekday,
    pub time: &'static str,
    pub venue_name: &'static str,
    pub venue_image: &'static str,
    pub location: &'static str,
    pub game_type: &'static str,
    pub prize_amount: &'static str,
    pub age_requirement: &'static str,
}

impl PokerGame {
    /// Sign-in is only offered on the day the game runs
    pub fn is_on(&self, day: Weekday) -> bool {
        self.day == day
    }
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum NewsCategory {
    Announcement,
    Winner,
    Update,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct NewsItem {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub date: &'static str,
    pub category: NewsCategory,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LeagueEvent {
    pub id: &'static str,
    pub title: &'static str,
    pub date: &'static str,
    pub time: &'static str,
    pub venue: &'static str,
    pub description: &'static str,
    pub prize_pool: &'static str,
    pub featured: bool,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardPlayer {
    pub id: &'static str,
    pub rank: u32,
    pub name: &'static str,
    pub points: u32,
    pub games_played: u32,
    pub avatar: &'static str,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub name: &'static str,
    pub avatar: &'static str,
    pub member_since: &'static str,
    pub games_played: u32,
    pub total_winnings: &'static str,
    pub current_rank: u32,
    pub season_points: u32,
}

const NLH: &str = "No Limit Texas Hold'em";

pub const GAMES: &[PokerGame] = &[
    PokerGame {
        id: "1",
        day: Weekday::Sun,
        time: "2:00 PM",
        venue_name: "The Brass Tap",
        venue_image: "https://images.unsplash.com/photo-1514933651103-005eec06c04b?w=400",
        location: "Johns Creek, GA",
        game_type: NLH,
        prize_amount: "$500",
        age_requirement: "21+",
    },
    PokerGame {
        id: "2",
        day: Weekday::Sun,
        time: "6:00 PM",
        venue_name: "Mac McGee's",
        venue_image: "https://images.unsplash.com/photo-1543007630-9710e4a00a20?w=400",
        location: "Decatur, GA",
        game_type: NLH,
        prize_amount: "$750",
        age_requirement: "21+",
    },
    PokerGame {
        id: "3",
        day: Weekday::Mon,
        time: "7:00 PM",
        venue_name: "Taco Mac",
        venue_image: "https://images.unsplash.com/photo-1572116469696-31de0f17cc34?w=400",
        location: "Alpharetta, GA",
        game_type: NLH,
        prize_amount: "$400",
        age_requirement: "21+",
    },
    PokerGame {
        id: "4",
        day: Weekday::Tue,
        time: "7:00 PM",
        venue_name: "Hudson Grille",
        venue_image: "https://images.unsplash.com/photo-1525610553991-2bede1a236e2?w=400",
        location: "Midtown, GA",
        game_type: NLH,
        prize_amount: "$600",
        age_requirement: "21+",
    },
    PokerGame {
        id: "5",
        day: Weekday::Tue,
        time: "8:00 PM",
        venue_name: "Whitehall Tavern",
        venue_image: "https://images.unsplash.com/photo-1566417713940-fe7c737a9ef2?w=400",
        location: "Buckhead, GA",
        game_type: "Pot Limit Omaha",
        prize_amount: "$500",
        age_requirement: "21+",
    },
    PokerGame {
        id: "6",
        day: Weekday::Wed,
        time: "7:00 PM",
        venue_name: "The Local No. 7",
        venue_image: "https://images.unsplash.com/photo-1470337458703-46ad1756a187?w=400",
        location: "Tucker, GA",
        game_type: NLH,
        prize_amount: "$550",
        age_requirement: "21+",
    },
    PokerGame {
        id: "7",
        day: Weekday::Thu,
        time: "7:00 PM",
        venue_name: "Marlow's Tavern",
        venue_image: "https://images.unsplash.com/photo-1538488881038-e252a119ace7?w=400",
        location: "Sandy Springs, GA",
        game_type: NLH,
        prize_amount: "$700",
        age_requirement: "21+",
    },
    PokerGame {
        id: "8",
        day: Weekday::Thu,
        time: "8:30 PM",
        venue_name: "Stats Brewpub",
        venue_image: "https://images.unsplash.com/photo-1514933651103-005eec06c04b?w=400",
        location: "Downtown Atlanta, GA",
        game_type: NLH,
        prize_amount: "$1,000",
        age_requirement: "21+",
    },
    PokerGame {
        id: "9",
        day: Weekday::Fri,
        time: "7:00 PM",
        venue_name: "Big Game Sports Bar",
        venue_image: "https://images.unsplash.com/photo-1572116469696-31de0f17cc34?w=400",
        location: "Roswell, GA",
        game_type: NLH,
        prize_amount: "$800",
        age_requirement: "21+",
    },
    PokerGame {
        id: "10",
        day: Weekday::Fri,
        time: "9:00 PM",
        venue_name: "Fadó Irish Pub",
        venue_image: "https://images.unsplash.com/photo-1543007630-9710e4a00a20?w=400",
        location: "Buckhead, GA",
        game_type: NLH,
        prize_amount: "$1,200",
        age_requirement: "21+",
    },
    PokerGame {
        id: "11",
        day: Weekday::Sat,
        time: "1:00 PM",
        venue_name: "Schoolhouse Brewing",
        venue_image: "https://images.unsplash.com/photo-1525610553991-2bede1a236e2?w=400",
        location: "Marietta, GA",
        game_type: NLH,
        prize_amount: "$500",
        age_requirement: "21+",
    },
    PokerGame {
        id: "12",
        day: Weekday::Sat,
        time: "5:00 PM",
        venue_name: "The Fred",
        venue_image: "https://images.unsplash.com/photo-1566417713940-fe7c737a9ef2?w=400",
        location: "Johns Creek, GA",
        game_type: "Tournament",
        prize_amount: "$2,000",
        age_requirement: "21+",
    },
    PokerGame {
        id: "13",
        day: Weekday::Sat,
        time: "8:00 PM",
        venue_name: "Vortex Bar & Grill",
        venue_image: "https://images.unsplash.com/photo-1470337458703-46ad1756a187?w=400",
        location: "Little Five Points, GA",
        game_type: NLH,
        prize_amount: "$750",
        age_requirement: "21+",
    },
];

const VENUE_DESCRIPTIONS: &[(&str, &str)] = &[
    ("The Brass Tap", "Experience craft beer excellence while you play! The Brass Tap offers an upscale sports bar atmosphere with over 60 beers on tap. Our poker corner features comfortable seating, great lighting, and a friendly crowd of regulars. Perfect for both beginners and seasoned players."),
    ("Mac McGee's", "Step into Atlanta's favorite Irish pub for a night of cards and craic! Mac McGee's brings authentic Irish hospitality to your poker experience. Enjoy traditional pub fare, excellent whiskey selection, and a lively atmosphere that makes every hand memorable."),
    ("Taco Mac", "Your neighborhood wing and beer joint with a passion for poker! Taco Mac offers a casual, sports-focused environment with massive TV screens and an extensive beer menu. Our weekly games attract a fun, competitive crowd looking for good times and great cards."),
    ("Hudson Grille", "Upscale American dining meets competitive poker at Hudson Grille. Enjoy premium cocktails and elevated pub cuisine in a sophisticated yet welcoming setting. Our Midtown location draws professionals looking to unwind with a friendly game after work."),
    ("Whitehall Tavern", "Buckhead's premier destination for craft cocktails and poker action! Whitehall Tavern combines trendy nightlife vibes with serious card play. The modern industrial decor and energetic crowd create the perfect backdrop for an exciting night at the tables."),
    ("The Local No. 7", "A true neighborhood gem in Tucker! The Local No. 7 prides itself on community and camaraderie. Our poker nights feature a welcoming mix of regulars and newcomers, fantastic bar food, and an atmosphere that feels like playing cards at a friend's house."),
    ("Marlow's Tavern", "Southern hospitality at its finest! Marlow's Tavern offers farm-to-table American tavern fare in a refined yet relaxed setting. Our Sandy Springs location hosts some of the most competitive games in the league, with players who appreciate both good food and good poker."),
    ("Stats Brewpub", "Downtown Atlanta's ultimate sports and poker destination! Stats Brewpub features house-crafted beers, massive screens for game-watching, and dedicated poker tables. The energy here is unmatched, especially on game nights when the city comes alive."),
    ("Big Game Sports Bar", "Go big or go home at Big Game Sports Bar! This Roswell hotspot is known for high-energy poker nights with fantastic drink specials. The spacious layout ensures comfortable play, and the enthusiastic staff keeps the games running smoothly."),
    ("Fadó Irish Pub", "Authentic Irish atmosphere in the heart of Buckhead! Fadó brings the spirit of a Dublin pub to your poker game. Enjoy perfectly poured Guinness, traditional Irish dishes, and a warm, welcoming environment that makes late-night games feel special."),
    ("Schoolhouse Brewing", "Where craft beer meets competitive cards! Schoolhouse Brewing in Marietta offers unique house-made beers in a converted schoolhouse setting. The quirky, creative atmosphere attracts a diverse crowd of beer enthusiasts and poker lovers alike."),
    ("The Fred", "Johns Creek's premier entertainment venue for serious poker! The Fred hosts our biggest tournaments with professional-grade equipment and dedicated staff. The spacious layout and focused atmosphere make it the go-to spot for players chasing the big prizes."),
    ("Vortex Bar & Grill", "Little Five Points' legendary burger joint brings attitude to the poker table! The Vortex is famous for outrageous burgers and an unapologetically unique atmosphere. Our games here attract players who appreciate character, creativity, and competition."),
];

const DEFAULT_VENUE_DESCRIPTION: &str = "Join us for an exciting evening of poker at one of Atlanta's finest venues. Experience great food, drinks, and competitive card play in a welcoming atmosphere.";

pub const NEWS: &[NewsItem] = &[
    NewsItem {
        id: "1",
        title: "New Venue Alert: Stats Brewpub Downtown",
        description: "We're excited to announce our newest venue partner! Join us every Thursday at Stats Brewpub in Downtown Atlanta.",
        date: "2 hours ago",
        category: NewsCategory::Announcement,
    },
    NewsItem {
        id: "2",
        title: "Congratulations to Mike T. - Weekly Champion!",
        description: "Mike T. took down the Saturday night tournament at The Fred with an impressive final table performance.",
        date: "1 day ago",
        category: NewsCategory::Winner,
    },
    NewsItem {
        id: "3",
        title: "Schedule Update: Tuesday Games Now at 7 PM",
        description: "All Tuesday evening games will now start at 7 PM instead of 7:30 PM. Plan your week accordingly!",
        date: "3 days ago",
        category: NewsCategory::Update,
    },
    NewsItem {
        id: "4",
        title: "Season 12 Leaderboard Reset Coming Soon",
        description: "Season 11 ends on December 31st. Final standings will be locked and prizes distributed shortly after.",
        date: "5 days ago",
        category: NewsCategory::Announcement,
    },
    NewsItem {
        id: "5",
        title: "Winner Spotlight: Sarah K.",
        description: "Sarah K. has been on fire this month with 3 first-place finishes. Read about her winning strategy.",
        date: "1 week ago",
        category: NewsCategory::Winner,
    },
];

pub const EVENTS: &[LeagueEvent] = &[
    LeagueEvent {
        id: "1",
        title: "Monthly Championship Tournament",
        date: "Dec 21, 2024",
        time: "2:00 PM",
        venue: "The Fred - Johns Creek",
        description: "Our biggest monthly event with guaranteed prize pool. Top 10 finishers earn season points.",
        prize_pool: "$5,000",
        featured: true,
    },
    LeagueEvent {
        id: "2",
        title: "2 Wins = 1 Spin Promo",
        date: "Ongoing",
        time: "All Games",
        venue: "All Venues",
        description: "Win any 2 games in a week and earn a spin on our prize wheel for bonus prizes!",
        prize_pool: "Varies",
        featured: true,
    },
    LeagueEvent {
        id: "3",
        title: "New Year's Eve Special",
        date: "Dec 31, 2024",
        time: "8:00 PM",
        venue: "Fadó Irish Pub - Buckhead",
        description: "Ring in the new year with cards! Special tournament with champagne toast at midnight.",
        prize_pool: "$3,000",
        featured: false,
    },
    LeagueEvent {
        id: "4",
        title: "Beginner's Night",
        date: "Every Wednesday",
        time: "6:00 PM",
        venue: "Taco Mac - Alpharetta",
        description: "New to poker? Join our beginner-friendly games with free lessons before the tournament.",
        prize_pool: "$200",
        featured: false,
    },
];

macro_rules! leader {
    ($id:literal, $rank:literal, $name:literal, $points:literal, $games:literal, $img:literal) => {
        LeaderboardPlayer {
            id: $id,
            rank: $rank,
            name: $name,
            points: $points,
            games_played: $games,
            avatar: concat!("https://i.pravatar.cc/150?img=", $img),
        }
    };
}

pub const LEADERBOARD: &[LeaderboardPlayer] = &[
    leader!("1", 1, "Mike T.", 2450, 45, "1"),
    leader!("2", 2, "Sarah K.", 2380, 42, "5"),
    leader!("3", 3, "James W.", 2210, 38, "3"),
    leader!("4", 4, "David L.", 2150, 41, "4"),
    leader!("5", 5, "Emily R.", 2080, 36, "9"),
    leader!("6", 6, "Chris M.", 1950, 33, "6"),
    leader!("7", 7, "Amanda P.", 1890, 35, "10"),
    leader!("8", 8, "Robert H.", 1820, 30, "8"),
    leader!("9", 9, "Jessica N.", 1750, 28, "11"),
    leader!("10", 10, "Lane B.", 1680, 25, "12"),
];

pub const USER_PROFILE: UserProfile = UserProfile {
    name: "Lane",
    avatar: "https://i.pravatar.cc/150?img=12",
    member_since: "March 2023",
    games_played: 25,
    total_winnings: "$1,250",
    current_rank: 10,
    season_points: 1680,
};

/// Games scheduled on a weekday, in start order
pub fn games_on(day: Weekday) -> Vec<&'static PokerGame> {
    GAMES.iter().filter(|g| g.day == day).collect()
}

pub fn find_game(game_id: &str) -> Option<&'static PokerGame> {
    GAMES.iter().find(|g| g.id == game_id)
}

pub fn venue_description(venue_name: &str) -> &'static str {
    VENUE_DESCRIPTIONS
        .iter()
        .find(|(name, _)| *name == venue_name)
        .map(|(_, description)| *description)
        .unwrap_or(DEFAULT_VENUE_DESCRIPTION)
}

/// Maps link for a venue; Apple Maps on iOS devices, Google Maps elsewhere
pub fn directions_url(game: &PokerGame, ios: bool) -> String {
    let address = format!("{}, {}", game.venue_name, game.location);
    let address = urlencoding::encode(&address);
    if ios {
        format!("maps://maps.apple.com/?q={}", address)
    } else {
        format!("https://www.google.com/maps/search/?api=1&query={}", address)
    }
}

/// Whether a user agent belongs to an iOS device
pub fn is_ios_user_agent(user_agent: &str) -> bool {
    ["iPad", "iPhone", "iPod"]
        .iter()
        .any(|device| user_agent.contains(device))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_games_by_day() {
        assert_eq!(games_on(Weekday::Thu).len(), 2);
        assert_eq!(games_on(Weekday::Sat).len(), 3);
        assert_eq!(GAMES.len(), 13);
        for day in Weekday::ALL {
            assert!(!games_on(day).is_empty(), "{:?} has no games", day);
        }
    }

    #[test]
    fn test_find_game() {
        let game = find_game("7").unwrap();
        assert_eq!(game.venue_name, "Marlow's Tavern");
        assert_eq!(game.day, Weekday::Thu);
        assert!(game.is_on(Weekday::Thu));
        assert!(!game.is_on(Weekday::Fri));
        assert!(find_game("99").is_none());
    }

    #[test]
    fn test_venue_description_fallback() {
        assert!(venue_description("Taco Mac").starts_with("Your neighborhood"));
        assert_eq!(venue_description("Nowhere"), DEFAULT_VENUE_DESCRIPTION);
    }

    #[test]
    fn test_parse_weekday() {
        assert_eq!("thu".parse::<Weekday>().unwrap(), Weekday::Thu);
        assert!("Thursday".parse::<Weekday>().is_err());
        assert_eq!(Weekday::from(chrono::Weekday::Sun), Weekday::Sun);
    }

    #[test]
    fn test_directions_url() {
        let game = find_game("13").unwrap();
        assert_eq!(
            directions_url(game, false),
            "https://www.google.com/maps/search/?api=1&query=Vortex%20Bar%20%26%20Grill%2C%20Little%20Five%20Points%2C%20GA"
        );
        assert!(directions_url(game, true).starts_with("maps://maps.apple.com/?q=Vortex"));
        assert_eq!(
            directions_url(find_game("7").unwrap(), true),
            "maps://maps.apple.com/?q=Marlow%27s%20Tavern%2C%20Sandy%20Springs%2C%20GA"
        );
        assert!(is_ios_user_agent("Mozilla/5.0 (iPhone; CPU iPhone OS 17_0)"));
        assert!(!is_ios_user_agent("Mozilla/5.0 (X11; Linux x86_64)"));
    }

    #[test]
    fn test_leaderboard_is_ranked() {
        assert!(LEADERBOARD.windows(2).all(|w| w[0].points > w[1].points));
        assert_eq!(LEADERBOARD[2].avatar, "https://i.pravatar.cc/150?img=3");
    }
}
