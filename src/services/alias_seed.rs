//! Built-in studio name table
//!
//! Canonical studio name → known spellings seen on releases and on the
//! catalog's site names. Learned mappings are merged over this at startup.

pub const STUDIO_SEED: &[(&str, &[&str])] = &[
    ("MilfVR", &["MILF VR", "MilfVR", "Milf VR"]),
    ("WankzVR", &["WANKZ VR", "WankzVR", "Wankz VR"]),
    ("VRBangers", &["VR Bangers", "VRBangers"]),
    ("BaDoinkVR", &["BaDoink VR", "BaDoinkVR"]),
    ("RealityLovers", &["Reality Lovers", "RealityLovers"]),
    ("VirtualRealPorn", &["Virtual Real Porn", "VirtualRealPorn", "VRP"]),
    ("CzechVR", &["Czech VR", "CzechVR"]),
    ("VRCosplayX", &["VR Cosplay X", "VRCosplayX", "VRCosplay X"]),
    ("SexBabesVR", &["Sex Babes VR", "SexBabesVR"]),
    ("VRLatina", &["VR Latina", "VRLatina"]),
    ("StockingsVR", &["Stockings VR", "StockingsVR"]),
    ("LethalHardcoreVR", &["Lethal Hardcore VR", "LethalHardcoreVR"]),
    ("18VR", &["18 VR", "18VR"]),
    ("POVR", &["POV R", "POVR", "POV VR"]),
    ("VRHush", &["VR Hush", "VRHush"]),
    ("SLROriginals", &["SLR Originals", "SLROriginals"]),
    ("VRConk", &["VR Conk", "VRConk"]),
    ("BrazzersExxtra", &["Brazzers Exxtra", "Brazzers", "BrazzersExxtra"]),
    ("BigWetButts", &["Big Wet Butts", "BigWetButts"]),
    ("BigTitsAtSchool", &["Big Tits At School", "BigTitsAtSchool"]),
    ("BigTitsAtWork", &["Big Tits At Work", "BigTitsAtWork"]),
    ("BigTitsInSports", &["Big Tits In Sports", "BigTitsInSports"]),
    ("BigTitsRoundAsses", &["Big Tits Round Asses", "BigTitsRoundAsses"]),
    ("DoctorAdventures", &["Doctor Adventures", "DoctorAdventures"]),
    ("HotAndMean", &["Hot And Mean", "HotAndMean"]),
    ("MilfsLikeItBig", &["Milfs Like It Big", "MilfsLikeItBig"]),
    ("MomsInControl", &["Moms In Control", "MomsInControl"]),
    ("PornstarsLikeItBig", &["Pornstars Like It Big", "PornstarsLikeItBig"]),
    ("RealWifeStories", &["Real Wife Stories", "RealWifeStories"]),
    ("ShesGonnaSquirt", &["Shes Gonna Squirt", "ShesGonnaSquirt"]),
    ("TeensLikeItBig", &["Teens Like It Big", "TeensLikeItBig"]),
    ("ZZSeries", &["ZZ Series", "ZZSeries"]),
    ("RealityKings", &["Reality Kings", "RealityKings"]),
    ("MikeInBrazil", &["Mike In Brazil", "MikeInBrazil"]),
    ("MonsterCurves", &["Monster Curves", "MonsterCurves"]),
    ("MomsLickTeens", &["Moms Lick Teens", "MomsLickTeens"]),
    ("WeLiveTogether", &["We Live Together", "WeLiveTogether"]),
    ("MomsBangTeens", &["Moms Bang Teens", "MomsBangTeens"]),
    ("StreetBlowjobs", &["Street Blowjobs", "StreetBlowjobs"]),
    ("EuroSexParties", &["Euro Sex Parties", "EuroSexParties"]),
    ("FirstTimeAuditions", &["First Time Auditions", "FirstTimeAuditions"]),
    ("8thStreetLatinas", &["8th Street Latinas", "8thStreetLatinas"]),
    ("NaughtyAmerica", &["Naughty America", "NaughtyAmerica"]),
    ("MyFirstSexTeacher", &["My First Sex Teacher", "MyFirstSexTeacher"]),
    ("MyFriendsHotMom", &["My Friends Hot Mom", "MyFriendsHotMom"]),
    ("MyDadsHotGirlfriend", &["My Dads Hot Girlfriend", "MyDadsHotGirlfriend"]),
    ("MySistersHotFriend", &["My Sisters Hot Friend", "MySistersHotFriend"]),
    ("NeighborAffair", &["Neighbor Affair", "NeighborAffair"]),
    ("DiaryOfANanny", &["Diary Of A Nanny", "DiaryOfANanny"]),
    ("FastTimes", &["Fast Times", "FastTimes"]),
    ("LatinAdultery", &["Latin Adultery", "LatinAdultery"]),
    ("SeducedByACougar", &["Seduced By A Cougar", "SeducedByACougar"]),
    ("ThunderCock", &["Thunder Cock", "ThunderCock"]),
    ("TonightsGirlfriend", &["Tonights Girlfriend", "TonightsGirlfriend"]),
    ("TeamSkeet", &["Team Skeet", "TeamSkeet"]),
    ("ExxxtraSmall", &["Exxxtra Small", "ExxxtraSmall"]),
    ("TeenPies", &["Teen Pies", "TeenPies"]),
    ("BadMilfs", &["Bad Milfs", "BadMilfs"]),
    ("DadCrush", &["Dad Crush", "DadCrush"]),
    ("DaughterSwap", &["Daughter Swap", "DaughterSwap"]),
    ("StepSiblings", &["Step Siblings", "StepSiblings"]),
    ("SisLovesMe", &["Sis Loves Me", "SisLovesMe"]),
    ("MyBabysittersClub", &["My Babysitters Club", "MyBabysittersClub"]),
    ("InnocentHigh", &["Innocent High", "InnocentHigh"]),
    ("FakehubOriginals", &["Fakehub Originals", "FakeHub Originals", "Fake Hub"]),
    ("FakeTaxi", &["Fake Taxi", "FakeTaxi"]),
    ("FakeAgent", &["Fake Agent", "FakeAgent"]),
    ("FakeAgentUK", &["Fake Agent UK", "FakeAgentUK"]),
    ("FakeHospital", &["Fake Hospital", "FakeHospital"]),
    ("FakeCop", &["Fake Cop", "FakeCop"]),
    ("FakeDrivingSchool", &["Fake Driving School", "FakeDrivingSchool"]),
    ("FakeHostel", &["Fake Hostel", "FakeHostel"]),
    ("PublicAgent", &["Public Agent", "PublicAgent"]),
    ("FemaleAgent", &["Female Agent", "FemaleAgent"]),
    ("FakeShooting", &["Fake Shooting", "FakeShooting"]),
    ("BangBros", &["Bang Bros", "BangBros"]),
    ("AssParade", &["Ass Parade", "AssParade"]),
    ("BackroomMILF", &["Backroom MILF", "BackroomMILF"]),
    ("BangBus", &["Bang Bus", "BangBus"]),
    ("BigMouthfuls", &["Big Mouthfuls", "BigMouthfuls"]),
    ("BigTitCreampie", &["Big Tit Creampie", "BigTitCreampie"]),
    ("BrownBunnies", &["Brown Bunnies", "BrownBunnies"]),
    ("MonstersOfCock", &["Monsters Of Cock", "MonstersOfCock"]),
    ("MILFLessons", &["MILF Lessons", "MILFLessons"]),
    ("PublicBang", &["Public Bang", "PublicBang"]),
    ("EvilAngel", &["Evil Angel", "EvilAngel"]),
    ("LeWood", &["LeWood", "Le Wood"]),
    ("JulesJordan", &["Jules Jordan", "JulesJordan"]),
    ("ArchAngelVideo", &["ArchAngel Video", "ArchAngelVideo"]),
    ("Vixen", &["Vixen"]),
    ("Blacked", &["Blacked"]),
    ("BlackedRaw", &["Blacked Raw", "BlackedRaw"]),
    ("Tushy", &["Tushy"]),
    ("TushyRaw", &["Tushy Raw", "TushyRaw"]),
    ("Deeper", &["Deeper"]),
    ("Slayed", &["Slayed"]),
    ("DigitalPlayground", &["Digital Playground", "DigitalPlayground"]),
    ("Mofos", &["Mofos"]),
    ("PublicPickups", &["Public Pickups", "PublicPickups"]),
    ("PervsOnPatrol", &["Pervs On Patrol", "PervsOnPatrol"]),
    ("DontBreakMe", &["Dont Break Me", "DontBreakMe"]),
    ("ShesBrandNew", &["Shes Brand New", "ShesBrandNew"]),
    ("IKnowThatGirl", &["I Know That Girl", "IKnowThatGirl"]),
    ("MilfsLikeItBlack", &["Milfs Like It Black", "MilfsLikeItBlack"]),
    ("ShareMyBF", &["Share My BF", "ShareMyBF"]),
    ("StrandedTeens", &["Stranded Teens", "StrandedTeens"]),
    ("PureTaboo", &["Pure Taboo", "PureTaboo"]),
    ("AdultTime", &["Adult Time", "AdultTime"]),
    ("GirlsWay", &["Girls Way", "GirlsWay"]),
    ("ModernDaySins", &["Modern Day Sins", "ModernDaySins"]),
    ("AllHerLuv", &["All Her Luv", "AllHerLuv"]),
    ("MissaX", &["MissaX", "Missa X"]),
    ("Hustler", &["Hustler"]),
    ("WickedPictures", &["Wicked Pictures", "WickedPictures"]),
    ("21Sextury", &["21 Sextury", "21Sextury"]),
    ("21Naturals", &["21 Naturals", "21Naturals"]),
    ("21FootArt", &["21 Foot Art", "21FootArt"]),
    ("AssholeFever", &["Asshole Fever", "AssholeFever"]),
    ("ClubSandy", &["Club Sandy", "ClubSandy"]),
    ("DPFanatics", &["DP Fanatics", "DPFanatics"]),
    ("Gapeland", &["Gapeland"]),
    ("GrandpasFuckTeens", &["Grandpas Fuck Teens", "GrandpasFuckTeens"]),
    ("LezCuties", &["Lez Cuties", "LezCuties"]),
    ("TeachMeFisting", &["Teach Me Fisting", "TeachMeFisting"]),
    ("Twistys", &["Twistys"]),
    ("TwistysHard", &["Twistys Hard", "TwistysHard"]),
    ("MomKnowsBest", &["Mom Knows Best", "MomKnowsBest"]),
    ("WhenGirlsPlay", &["When Girls Play", "WhenGirlsPlay"]),
    ("DDFNetwork", &["DDF Network", "DDFNetwork"]),
    ("HandsOnHardcore", &["Hands On Hardcore", "HandsOnHardcore"]),
    ("HotLegsAndFeet", &["Hot Legs And Feet", "HotLegsAndFeet"]),
    ("OnlyBlowjob", &["Only Blowjob", "OnlyBlowjob"]),
    ("EuroBabesHD", &["Euro Babes HD", "EuroBabesHD"]),
    ("Penthouse", &["Penthouse"]),
    ("PenthouseGold", &["Penthouse Gold", "PenthouseGold"]),
    ("PropertySex", &["Property Sex", "PropertySex"]),
    ("PassionHD", &["Passion HD", "PassionHD"]),
    ("Lubed", &["Lubed"]),
    ("Exotic4K", &["Exotic 4K", "Exotic4K"]),
    ("Tiny4K", &["Tiny 4K", "Tiny4K"]),
    ("POVD", &["POV D", "POVD"]),
    ("CastingCouchX", &["Casting Couch X", "CastingCouchX"]),
    ("PureMature", &["Pure Mature", "PureMature"]),
    ("FantasyHD", &["Fantasy HD", "FantasyHD"]),
    ("MassageCreep", &["Massage Creep", "MassageCreep"]),
    ("Nubiles", &["Nubiles"]),
    ("NubileFilms", &["Nubile Films", "NubileFilms"]),
    ("NubilesET", &["Nubiles ET", "NubilesET"]),
    ("NFBusty", &["NF Busty", "NFBusty"]),
    ("PetiteHDPorn", &["Petite HD Porn", "PetiteHDPorn"]),
    ("StepSiblingsCaught", &["Step Siblings Caught", "StepSiblingsCaught"]),
    ("BrattySis", &["Bratty Sis", "BrattySis"]),
    ("MomsTeachSex", &["Moms Teach Sex", "MomsTeachSex"]),
    ("MyFamilyPies", &["My Family Pies", "MyFamilyPies"]),
    ("PrincessCum", &["Princess Cum", "PrincessCum"]),
    ("MYLKED", &["MYLKED"]),
    ("GilfAF", &["GilfAF", "Gilf AF"]),
    ("SeeHimFuck", &["See Him Fuck", "SeeHimFuck"]),
    ("Swallowed", &["Swallowed"]),
    ("AllAnal", &["All Anal", "AllAnal"]),
    ("TrueAnal", &["True Anal", "TrueAnal"]),
    ("SpyFam", &["Spy Fam", "SpyFam"]),
    ("EroticaX", &["Erotica X", "EroticaX"]),
    ("HardX", &["Hard X", "HardX"]),
    ("DarkX", &["Dark X", "DarkX"]),
    ("LesbianX", &["Lesbian X", "LesbianX"]),
    ("NewSensations", &["New Sensations", "NewSensations"]),
    ("SweetSinner", &["Sweet Sinner", "SweetSinner"]),
    ("ZeroTolerance", &["Zero Tolerance", "ZeroTolerance"]),
    ("CzechCasting", &["Czech Casting", "CzechCasting"]),
    ("CzechMassage", &["Czech Massage", "CzechMassage"]),
    ("CzechStreets", &["Czech Streets", "CzechStreets"]),
    ("CzechFantasy", &["Czech Fantasy", "CzechFantasy"]),
    ("CzechGangBang", &["Czech Gang Bang", "CzechGangBang"]),
    ("CzechSolarium", &["Czech Solarium", "CzechSolarium"]),
    ("TransAngels", &["Trans Angels", "TransAngels"]),
    ("TSPlayground", &["TS Playground", "TSPlayground"]),
    ("EvilAngelTS", &["Evil Angel TS", "EvilAngelTS"]),
    ("BackroomCastingCouch", &["Backroom Casting Couch", "BackroomCastingCouch"]),
    ("NetVideoGirls", &["Net Video Girls", "NetVideoGirls"]),
    ("ExploitedCollegeGirls", &["Exploited College Girls", "ExploitedCollegeGirls"]),
    ("Caribbeancom", &["Caribbeancom", "Caribbean Com"]),
    ("1Pondo", &["1Pondo", "1 Pondo"]),
    ("TokyoHot", &["Tokyo Hot", "TokyoHot"]),
    ("HEYZO", &["HEYZO", "Heyzo"]),
    ("Pacopacomama", &["Pacopacomama"]),
    ("Muramura", &["Muramura"]),
];
